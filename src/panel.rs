//! Panel lifecycle: mount a panel on a scheduler, read snapshots, unmount.
//!
//! A mounted panel's state is shared between the owner (who reads snapshots
//! and handles user actions) and the timer callback (which ticks it). The
//! timer handle lives inside [`MountedPanel`], so unmounting or dropping it
//! stops the updates.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{TwinError, TwinResult, ValidationError};
use crate::random::RandomSource;
use crate::scheduler::{Scheduler, TimerHandle};

/// A dashboard panel driven by a periodic timer.
pub trait Panel: Clone + Serialize + Send + 'static {
    /// Stable name, used for logging and for deriving the panel's RNG stream.
    const NAME: &'static str;

    /// One timer tick. `now` is the scheduler's wall-clock time.
    fn on_tick(&mut self, rng: &mut dyn RandomSource, now: DateTime<Utc>);
}

/// Panel state shared between its owner and its timer callback.
pub type SharedPanel<P> = Arc<Mutex<P>>;

pub(crate) fn lock_panel<P: Panel>(state: &Mutex<P>) -> TwinResult<MutexGuard<'_, P>> {
    state.lock().map_err(|_| TwinError::poisoned(P::NAME))
}

/// A panel whose timer is live. Dropping it unmounts the panel.
pub struct MountedPanel<P: Panel> {
    state: SharedPanel<P>,
    timer: TimerHandle,
    interval: Duration,
}

impl<P: Panel> MountedPanel<P> {
    /// Returns a clone of the current state.
    pub fn snapshot(&self) -> TwinResult<P> {
        Ok(lock_panel(&self.state)?.clone())
    }

    /// Runs `f` against the current state.
    pub fn with<T>(&self, f: impl FnOnce(&P) -> T) -> TwinResult<T> {
        let guard = lock_panel(&self.state)?;
        Ok(f(&guard))
    }

    /// Runs `f` with mutable access, as a user action would.
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut P) -> T) -> TwinResult<T> {
        let mut guard = lock_panel(&self.state)?;
        Ok(f(&mut guard))
    }

    /// Shared state handle, for wiring additional timers to the same panel.
    #[must_use]
    pub fn shared(&self) -> SharedPanel<P> {
        Arc::clone(&self.state)
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.timer.is_cancelled()
    }

    /// Stops the updates and returns the final state.
    pub fn unmount(self) -> TwinResult<P> {
        self.timer.cancel();
        tracing::debug!(panel = P::NAME, "panel unmounted");
        self.snapshot()
    }
}

/// Mounts `panel` on `scheduler`, ticking it every `interval` with `rng`.
///
/// # Errors
///
/// Returns `ValidationError::ZeroInterval` for a zero interval, or the
/// scheduler's error if the timer cannot be registered.
pub fn mount<P, R>(
    scheduler: &dyn Scheduler,
    panel: P,
    interval: Duration,
    mut rng: R,
) -> TwinResult<MountedPanel<P>>
where
    P: Panel,
    R: RandomSource + 'static,
{
    if interval.is_zero() {
        return Err(ValidationError::ZeroInterval {
            name: P::NAME.to_string(),
        }
        .into());
    }

    let state: SharedPanel<P> = Arc::new(Mutex::new(panel));
    let tick_state = Arc::clone(&state);

    let timer = scheduler.schedule_repeating(
        interval,
        Box::new(move |ctx| match tick_state.lock() {
            Ok(mut panel) => panel.on_tick(&mut rng, ctx.now()),
            Err(_) => tracing::warn!(panel = P::NAME, timer = %ctx.id(), "skipping tick on poisoned panel"),
        }),
    )?;

    tracing::debug!(panel = P::NAME, interval_ms = interval.as_millis() as u64, "panel mounted");

    Ok(MountedPanel {
        state,
        timer,
        interval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use crate::scheduler::VirtualScheduler;

    #[derive(Debug, Clone, Serialize)]
    struct Ticks {
        count: u32,
        last: Option<DateTime<Utc>>,
    }

    impl Panel for Ticks {
        const NAME: &'static str = "ticks";

        fn on_tick(&mut self, _rng: &mut dyn RandomSource, now: DateTime<Utc>) {
            self.count += 1;
            self.last = Some(now);
        }
    }

    #[test]
    fn mounted_panel_ticks_until_unmounted() {
        let sched = VirtualScheduler::starting_at(DateTime::<Utc>::UNIX_EPOCH);
        let panel = Ticks { count: 0, last: None };
        let mounted = mount(&sched, panel, Duration::from_secs(1), ScriptedRandom::constant(0.5)).unwrap();

        sched.advance(Duration::from_secs(3)).unwrap();
        let snap = mounted.snapshot().unwrap();
        assert_eq!(snap.count, 3);
        assert_eq!(snap.last.unwrap().timestamp_millis(), 3000);

        let last = mounted.unmount().unwrap();
        assert_eq!(last.count, 3);
        sched.advance(Duration::from_secs(5)).unwrap();
        assert_eq!(sched.pending().unwrap(), 0);
    }

    #[test]
    fn dropping_mounted_panel_cancels_timer() {
        let sched = VirtualScheduler::new();
        let mounted = mount(
            &sched,
            Ticks { count: 0, last: None },
            Duration::from_secs(1),
            ScriptedRandom::constant(0.5),
        )
        .unwrap();
        let shared = mounted.shared();
        drop(mounted);
        sched.advance(Duration::from_secs(5)).unwrap();
        assert_eq!(shared.lock().unwrap().count, 0);
    }

    #[test]
    fn user_actions_see_and_edit_live_state() {
        let sched = VirtualScheduler::new();
        let mounted = mount(
            &sched,
            Ticks { count: 0, last: None },
            Duration::from_secs(1),
            ScriptedRandom::constant(0.5),
        )
        .unwrap();

        sched.advance(Duration::from_secs(2)).unwrap();
        assert_eq!(mounted.with(|p| p.count).unwrap(), 2);

        let before = mounted.with_mut(|p| std::mem::replace(&mut p.count, 10)).unwrap();
        assert_eq!(before, 2);
        sched.advance(Duration::from_secs(1)).unwrap();
        assert_eq!(mounted.with(|p| p.count).unwrap(), 11);
    }

    #[test]
    fn zero_interval_rejected() {
        let sched = VirtualScheduler::new();
        let err = mount(
            &sched,
            Ticks { count: 0, last: None },
            Duration::ZERO,
            ScriptedRandom::constant(0.5),
        )
        .err()
        .unwrap();
        assert!(err.is_validation());
    }
}
