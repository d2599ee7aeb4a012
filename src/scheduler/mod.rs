//! Timer scheduling for mounted panels.
//!
//! Every recurring update and every delayed scenario phase is registered on a
//! [`Scheduler`] and owned through a [`TimerHandle`]. Dropping the handle
//! cancels the timer, so a panel that goes away can never be ticked again.
//!
//! Three drivers share the same contract:
//! - [`VirtualScheduler`]: manual clock, deterministic, used by tests.
//! - [`ThreadScheduler`]: real time on a dedicated worker thread.
//! - `TokioScheduler` (feature `tokio`): tasks on a tokio runtime.

/// Min-heap of armed timers shared by the drivers.
pub(crate) mod queue;
/// Real-time worker-thread driver.
pub mod thread;
/// Manually advanced driver.
pub mod virtual_clock;

#[cfg(feature = "tokio")]
/// tokio-backed driver.
pub mod tokio_driver;

pub use thread::{ThreadScheduler, ThreadSchedulerConfig};
pub use virtual_clock::VirtualScheduler;

#[cfg(feature = "tokio")]
pub use tokio_driver::TokioScheduler;

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TwinResult, ValidationError};

/// Identifier of a registered timer, unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

#[derive(Debug, Default)]
pub(crate) struct TimerIds(AtomicU64);

impl TimerIds {
    pub(crate) fn next(&self) -> TimerId {
        TimerId(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// What a callback sees when its timer fires.
#[derive(Debug, Clone, Copy)]
pub struct TimerContext {
    id: TimerId,
    elapsed: Duration,
    now: DateTime<Utc>,
}

impl TimerContext {
    pub(crate) const fn new(id: TimerId, elapsed: Duration, now: DateTime<Utc>) -> Self {
        Self { id, elapsed, now }
    }

    #[must_use]
    pub const fn id(&self) -> TimerId {
        self.id
    }

    /// Scheduler time at which the timer was due.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Wall-clock instant corresponding to [`TimerContext::elapsed`].
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Timer callback. Runs on the scheduler's driving thread or task.
pub type TimerCallback = Box<dyn FnMut(&TimerContext) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKind {
    Once,
    Repeating { interval: Duration },
}

/// Owning handle for a registered timer.
///
/// Cancellation is idempotent and takes effect before the next firing. The
/// timer is also cancelled when the handle is dropped.
#[derive(Debug)]
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    id: TimerId,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub(crate) fn new(id: TimerId) -> (Self, Arc<AtomicBool>) {
        let cancelled = Arc::new(AtomicBool::new(false));
        (
            Self {
                id,
                cancelled: Arc::clone(&cancelled),
            },
            cancelled,
        )
    }

    #[must_use]
    pub const fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            tracing::trace!(timer = %self.id, "timer cancelled");
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Registers timers and drives their callbacks.
pub trait Scheduler: Send + Sync {
    /// Fire `callback` every `interval`, first after one full interval.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ZeroInterval` for a zero interval, or an
    /// execution error if the driver is gone.
    fn schedule_repeating(&self, interval: Duration, callback: TimerCallback) -> TwinResult<TimerHandle>;

    /// Fire `callback` once after `delay`.
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TwinResult<TimerHandle>;

    /// Current scheduler time as a wall-clock instant.
    fn now(&self) -> DateTime<Utc>;
}

pub(crate) fn ensure_interval(interval: Duration) -> Result<(), ValidationError> {
    if interval.is_zero() {
        return Err(ValidationError::ZeroInterval {
            name: "repeating timer".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn wall_clock(epoch: DateTime<Utc>, elapsed: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(elapsed)
        .ok()
        .and_then(|d| epoch.checked_add_signed(d))
        .unwrap_or(epoch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_cancel_is_idempotent() {
        let (handle, flag) = TimerHandle::new(TimerId(1));
        assert!(!handle.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(flag.load(Ordering::Acquire));
    }

    #[test]
    fn dropping_handle_cancels() {
        let (handle, flag) = TimerHandle::new(TimerId(2));
        drop(handle);
        assert!(flag.load(Ordering::Acquire));
    }

    #[test]
    fn ids_are_monotonic() {
        let ids = TimerIds::default();
        let a = ids.next();
        let b = ids.next();
        assert!(b > a);
        assert_eq!(a.to_string(), "timer-1");
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(ensure_interval(Duration::ZERO).is_err());
        assert!(ensure_interval(Duration::from_millis(1)).is_ok());
    }

    #[test]
    fn wall_clock_offsets_epoch() {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        let t = wall_clock(epoch, Duration::from_millis(2500));
        assert_eq!(t.timestamp_millis(), 2500);
    }
}
