//! # railtwin - Smart Train Digital Twin dashboard model
//!
//! railtwin is the state layer of a simulated rail operations dashboard. It
//! holds the mock records behind every panel, moves them on fixed timers with
//! bounded random walks, maps their categorical fields to display styles, and
//! runs a small scenario simulator that walks a disruption through
//! `running -> analyzing -> completed`.
//!
//! ## Core Concepts
//!
//! - **Panel**: a serializable block of mock state with an `on_tick` rule
//! - **Walk / Accumulate**: per-field perturbation rules with a clamp domain
//! - **Scheduler**: owns every timer; dropping a `TimerHandle` cancels it
//! - **Presentable**: total mapping from a categorical value to a style
//! - **ScenarioConsole**: launches and cancels simulator runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use railtwin::{Dashboard, TwinConfig, VirtualScheduler};
//!
//! let scheduler = Arc::new(VirtualScheduler::new());
//! let mut dashboard = Dashboard::mount(scheduler.clone(), &TwinConfig::default())?;
//!
//! dashboard.launch("SIM004")?;
//! scheduler.advance(Duration::from_secs(5))?;
//!
//! let snapshot = dashboard.snapshot()?;
//! println!("{}", serde_json::to_string_pretty(&snapshot)?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Foundations
pub mod error;
pub mod mutator;
pub mod random;
pub mod style;

// Timers and panel lifecycle
pub mod panel;
pub mod scheduler;

// Dashboard content
pub mod config;
pub mod dashboard;
pub mod panels;
pub mod portfolio;
pub mod scenario;

// Re-export primary types at crate root for convenience
pub use config::TwinConfig;
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use error::{ExecutionError, TwinError, TwinResult, ValidationError};
pub use mutator::{Accumulate, Bounds, FeedPolicy, Perturb, RecordStore, Walk};
pub use panel::{mount, MountedPanel, Panel};
pub use random::{RandomSource, ScriptedRandom, SimRng};
pub use scenario::{Launch, Phase, RunId, Scenario, ScenarioConsole, ScenarioKind};
pub use scheduler::{Scheduler, ThreadScheduler, ThreadSchedulerConfig, TimerHandle, VirtualScheduler};
pub use style::{Presentable, Severity, StyleDescriptor};

#[cfg(feature = "tokio")]
pub use scheduler::TokioScheduler;
