//! Error types for railtwin.
//!
//! All errors in railtwin are strongly typed using thiserror.
//! Nothing here performs I/O except config loading, so most failures are
//! validation problems caught when a rule, panel or scheduler is built.

use std::path::PathBuf;

use thiserror::Error;

/// Validation errors that occur while building rules, records or config.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid bounds: min ({min}) must be finite and not greater than max ({max})")]
    InvalidBounds {
        min: f64,
        max: f64,
    },

    #[error("Step {step} must be finite and non-negative")]
    InvalidStep {
        step: f64,
    },

    #[error("Interval for '{name}' must be greater than zero")]
    ZeroInterval {
        name: String,
    },

    #[error("Probability {value} is out of range [0.0, 1.0]")]
    ProbabilityOutOfRange {
        value: f64,
    },

    #[error("Capacity '{field}' must be greater than zero")]
    ZeroCapacity {
        field: String,
    },

    #[error("Skill '{name}' has level {level}, expected 0..=100")]
    LevelOutOfRange {
        name: String,
        level: u8,
    },

    #[error("Unknown scenario: {id}")]
    UnknownScenario {
        id: String,
    },

    #[error("Invalid config: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Execution errors raised while panels and timers are running.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Lock poisoned: {context}")]
    LockPoisoned {
        context: String,
    },

    #[error("Scheduler disconnected: {path}")]
    Disconnected {
        path: String,
    },

    #[error("Scheduler control queue is full (capacity {capacity})")]
    QueueFull {
        capacity: usize,
    },
}

/// Top-level error type for railtwin.
#[derive(Debug, Error)]
pub enum TwinError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Config error ({}): {message}", path.display())]
    Config {
        path: PathBuf,
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl TwinError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a poisoned-lock execution error for the given context.
    #[must_use]
    pub fn poisoned(context: impl Into<String>) -> Self {
        Self::Execution(ExecutionError::LockPoisoned {
            context: context.into(),
        })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if this is a config loading error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false, // Validation errors won't change on retry
            Self::Execution(e) => matches!(e, ExecutionError::QueueFull { .. }),
            Self::Config { .. } | Self::Internal { .. } => false,
        }
    }
}

/// Result type alias for railtwin operations.
pub type TwinResult<T> = Result<T, TwinError>;
