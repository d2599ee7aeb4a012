use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use crate::error::{TwinError, TwinResult};

use super::{
    ensure_interval, wall_clock, Scheduler, TimerCallback, TimerContext, TimerHandle, TimerId,
    TimerIds,
};

/// Scheduler that runs each timer as a task on a tokio runtime.
///
/// Uses `tokio::time`, so paused test time (`start_paused = true`) drives it
/// deterministically. A cancelled task exits at its next wake-up without
/// running the callback.
pub struct TokioScheduler {
    runtime: Handle,
    ids: TimerIds,
    epoch: DateTime<Utc>,
    started: Instant,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            ids: TimerIds::default(),
            epoch: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Binds to the runtime of the calling task.
    pub fn current() -> TwinResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| TwinError::internal(format!("no tokio runtime: {e}")))?;
        Ok(Self::new(runtime))
    }

    fn context(&self, id: TimerId) -> impl Fn() -> TimerContext + Send + 'static {
        let started = self.started;
        let epoch = self.epoch;
        move || {
            let elapsed = started.elapsed();
            TimerContext::new(id, elapsed, wall_clock(epoch, elapsed))
        }
    }
}

fn live(cancelled: &AtomicBool) -> bool {
    !cancelled.load(Ordering::Acquire)
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, interval: Duration, mut callback: TimerCallback) -> TwinResult<TimerHandle> {
        ensure_interval(interval)?;
        let id = self.ids.next();
        let (handle, cancelled) = TimerHandle::new(id);
        let context = self.context(id);

        self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                ticker.tick().await;
                if !live(&cancelled) {
                    break;
                }
                callback(&context());
            }
        });

        Ok(handle)
    }

    fn schedule_once(&self, delay: Duration, mut callback: TimerCallback) -> TwinResult<TimerHandle> {
        let id = self.ids.next();
        let (handle, cancelled): (TimerHandle, Arc<AtomicBool>) = TimerHandle::new(id);
        let context = self.context(id);

        self.runtime.spawn(async move {
            sleep(delay).await;
            if live(&cancelled) {
                callback(&context());
            }
        });

        Ok(handle)
    }

    fn now(&self) -> DateTime<Utc> {
        wall_clock(self.epoch, self.started.elapsed())
    }
}
