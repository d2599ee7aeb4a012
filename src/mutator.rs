//! Periodic mutator building blocks.
//!
//! Panels describe how each numeric field moves per tick with a [`Walk`]
//! (bounded additive noise) or an [`Accumulate`] (monotonic counter). A
//! [`RecordStore`] applies a record type's [`Perturb`] impl to every record,
//! preserving length and order, and a [`FeedPolicy`] implements the
//! probabilistic prepend-and-evict behaviour of event feeds.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::random::RandomSource;

/// Closed numeric domain `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    /// Creates bounds without checking them.
    ///
    /// Intended for compile-time rule tables; call [`Bounds::validate`] in a
    /// test for every such table.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Creates bounds, rejecting non-finite limits and `min > max`.
    pub fn try_new(min: f64, max: f64) -> Result<Self, ValidationError> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks that both limits are finite and ordered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ValidationError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Clamps `value` into the domain. NaN maps to `min`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() || value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Bounded random walk: `clamp(current + uniform(-step, step), min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Walk {
    step: f64,
    bounds: Bounds,
}

impl Walk {
    #[must_use]
    pub const fn new(step: f64, min: f64, max: f64) -> Self {
        Self {
            step,
            bounds: Bounds::new(min, max),
        }
    }

    /// Same step, different domain. Used for per-record limits such as a
    /// vehicle's capacity.
    #[must_use]
    pub const fn with_bounds(self, bounds: Bounds) -> Self {
        Self {
            step: self.step,
            bounds,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.step.is_finite() || self.step < 0.0 {
            return Err(ValidationError::InvalidStep { step: self.step });
        }
        self.bounds.validate()
    }

    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// One tick of the walk for a continuous field.
    pub fn apply(&self, current: f64, rng: &mut dyn RandomSource) -> f64 {
        self.bounds.clamp(current + rng.symmetric(self.step))
    }

    /// One tick of the walk for a whole-number field; the noise is floored.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply_count(&self, current: u32, rng: &mut dyn RandomSource) -> u32 {
        let next = self
            .bounds
            .clamp(f64::from(current) + rng.symmetric(self.step).floor())
            .max(0.0);
        next.floor() as u32
    }
}

/// Additive-only counter: `current + uniform(0, max_step)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accumulate {
    max_step: f64,
}

impl Accumulate {
    #[must_use]
    pub const fn new(max_step: f64) -> Self {
        Self { max_step }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.max_step.is_finite() || self.max_step < 0.0 {
            return Err(ValidationError::InvalidStep {
                step: self.max_step,
            });
        }
        Ok(())
    }

    /// Never returns less than `current`.
    pub fn apply(&self, current: f64, rng: &mut dyn RandomSource) -> f64 {
        let next = current + rng.uniform(0.0, self.max_step);
        if next.is_finite() && next >= current {
            next
        } else {
            current
        }
    }

    /// Whole-number variant; the increment is floored and saturates.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply_count(&self, current: u64, rng: &mut dyn RandomSource) -> u64 {
        let inc = rng.uniform(0.0, self.max_step).floor().max(0.0);
        current.saturating_add(inc as u64)
    }
}

/// A record whose numeric fields move on every tick.
pub trait Perturb: Clone {
    /// Returns the next version of this record. Non-numeric fields must be
    /// copied unchanged.
    #[must_use]
    fn perturbed(&self, rng: &mut dyn RandomSource) -> Self;
}

/// Perturbs every record, keeping length and order.
pub fn perturb_all<R: Perturb>(records: &[R], rng: &mut dyn RandomSource) -> Vec<R> {
    records.iter().map(|r| r.perturbed(rng)).collect()
}

/// Ordered in-memory list of mock records owned by one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R> RecordStore<R> {
    #[must_use]
    pub fn new(seed: Vec<R>) -> Self {
        Self { records: seed }
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Perturb> RecordStore<R> {
    /// Replaces the store with the perturbed sequence.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.records = perturb_all(&self.records, rng);
    }
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<'a, R> IntoIterator for &'a RecordStore<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Probabilistic prepend with a hard cap. Newest entries sit at the front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedPolicy {
    probability: f64,
    capacity: usize,
}

impl FeedPolicy {
    /// Unchecked constructor for literal policies. Use [`Self::try_new`] for
    /// configured values.
    #[must_use]
    pub const fn new(probability: f64, capacity: usize) -> Self {
        Self {
            probability,
            capacity,
        }
    }

    pub fn try_new(probability: f64, capacity: usize) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ValidationError::ProbabilityOutOfRange { value: probability });
        }
        if capacity == 0 {
            return Err(ValidationError::ZeroCapacity {
                field: "feed.capacity".to_string(),
            });
        }
        Ok(Self {
            probability,
            capacity,
        })
    }

    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rolls once; on success builds a record with `make` and prepends it.
    /// The feed is trimmed to capacity either way. Returns whether a record
    /// was added.
    pub fn offer<R>(
        &self,
        feed: &mut VecDeque<R>,
        rng: &mut dyn RandomSource,
        make: impl FnOnce(&mut dyn RandomSource) -> R,
    ) -> bool {
        let added = rng.chance(self.probability);
        if added {
            let record = make(rng);
            feed.push_front(record);
        }
        feed.truncate(self.capacity);
        added
    }
}
