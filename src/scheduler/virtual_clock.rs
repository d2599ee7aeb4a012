use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{TwinError, TwinResult};

use super::queue::TimerQueue;
use super::{
    ensure_interval, wall_clock, Scheduler, TimerCallback, TimerContext, TimerHandle, TimerIds,
    TimerKind,
};

struct VirtualState {
    elapsed: Duration,
    queue: TimerQueue,
}

/// Scheduler whose clock only moves when [`VirtualScheduler::advance`] is called.
///
/// Callbacks run on the caller's thread, in `(due, registration)` order, with
/// the clock set to each timer's due time. No lock is held while a callback
/// runs, so callbacks may register or cancel timers on this scheduler.
pub struct VirtualScheduler {
    state: Mutex<VirtualState>,
    ids: TimerIds,
    epoch: DateTime<Utc>,
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualScheduler {
    /// Starts the virtual clock at the current wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Starts the virtual clock at `epoch`.
    #[must_use]
    pub fn starting_at(epoch: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(VirtualState {
                elapsed: Duration::ZERO,
                queue: TimerQueue::default(),
            }),
            ids: TimerIds::default(),
            epoch,
        }
    }

    fn lock(&self) -> TwinResult<std::sync::MutexGuard<'_, VirtualState>> {
        self.state
            .lock()
            .map_err(|_| TwinError::poisoned("virtual scheduler"))
    }

    /// Time advanced so far.
    pub fn elapsed(&self) -> TwinResult<Duration> {
        Ok(self.lock()?.elapsed)
    }

    /// Number of timers that can still fire.
    pub fn pending(&self) -> TwinResult<usize> {
        Ok(self.lock()?.queue.live())
    }

    /// Moves the clock forward by `by`, firing every timer that falls due.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> TwinResult<usize> {
        let target = self.lock()?.elapsed.saturating_add(by);
        let mut fired = 0;

        loop {
            let next = {
                let mut state = self.lock()?;
                if let Some(timer) = state.queue.take_due(target) {
                    state.elapsed = timer.due;
                    Some(timer)
                } else {
                    state.elapsed = target;
                    state.queue.purge_cancelled();
                    None
                }
            };
            let Some(mut timer) = next else {
                break;
            };

            let ctx = TimerContext::new(timer.id, timer.due, wall_clock(self.epoch, timer.due));
            timer.fire(&ctx);
            fired += 1;

            self.lock()?.queue.finish(timer);
        }

        Ok(fired)
    }

    fn register(&self, delay: Duration, kind: TimerKind, callback: TimerCallback) -> TwinResult<TimerHandle> {
        let mut state = self.lock()?;
        let id = self.ids.next();
        let (handle, cancelled) = TimerHandle::new(id);
        let due = state.elapsed.saturating_add(delay);
        state.queue.insert(id, due, kind, callback, cancelled);
        Ok(handle)
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule_repeating(&self, interval: Duration, callback: TimerCallback) -> TwinResult<TimerHandle> {
        ensure_interval(interval)?;
        self.register(interval, TimerKind::Repeating { interval }, callback)
    }

    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TwinResult<TimerHandle> {
        self.register(delay, TimerKind::Once, callback)
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = self.state.lock().map_or(Duration::ZERO, |s| s.elapsed);
        wall_clock(self.epoch, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, TimerCallback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let cb: TimerCallback = Box::new(move |_ctx| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (hits, cb)
    }

    #[test]
    fn repeating_fires_once_per_interval() {
        let sched = VirtualScheduler::starting_at(DateTime::<Utc>::UNIX_EPOCH);
        let (hits, cb) = counter();
        let _handle = sched.schedule_repeating(Duration::from_secs(2), cb).unwrap();

        assert_eq!(sched.advance(Duration::from_millis(1999)).unwrap(), 0);
        assert_eq!(sched.advance(Duration::from_millis(1)).unwrap(), 1);
        assert_eq!(sched.advance(Duration::from_secs(6)).unwrap(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 4);
        assert_eq!(sched.elapsed().unwrap(), Duration::from_secs(8));
    }

    #[test]
    fn dropped_handle_never_fires() {
        let sched = VirtualScheduler::new();
        let (hits, cb) = counter();
        let handle = sched.schedule_repeating(Duration::from_secs(1), cb).unwrap();
        sched.advance(Duration::from_secs(1)).unwrap();
        drop(handle);
        sched.advance(Duration::from_secs(10)).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(sched.pending().unwrap(), 0);
    }

    #[test]
    fn once_fires_exactly_once() {
        let sched = VirtualScheduler::new();
        let (hits, cb) = counter();
        let _handle = sched.schedule_once(Duration::from_millis(500), cb).unwrap();
        sched.advance(Duration::from_secs(5)).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn context_reports_due_time() {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        let sched = VirtualScheduler::starting_at(epoch);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let _handle = sched
            .schedule_repeating(
                Duration::from_millis(1500),
                Box::new(move |ctx| s.lock().unwrap().push(ctx.now().timestamp_millis())),
            )
            .unwrap();
        sched.advance(Duration::from_secs(5)).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1500, 3000, 4500]);
        assert_eq!(sched.now().timestamp_millis(), 5000);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let sched = VirtualScheduler::new();
        let (_, cb) = counter();
        let err = sched.schedule_repeating(Duration::ZERO, cb).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn callback_can_cancel_its_sibling() {
        let sched = Arc::new(VirtualScheduler::new());
        let (hits, cb) = counter();
        let victim = sched.schedule_once(Duration::from_secs(2), cb).unwrap();
        let slot = Arc::new(Mutex::new(Some(victim)));
        let s = Arc::clone(&slot);
        let _killer = sched
            .schedule_once(
                Duration::from_secs(1),
                Box::new(move |_| {
                    s.lock().unwrap().take();
                }),
            )
            .unwrap();
        sched.advance(Duration::from_secs(3)).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
