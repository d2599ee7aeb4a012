use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};

use crate::error::{ExecutionError, TwinError, TwinResult};

use super::queue::TimerQueue;
use super::{
    ensure_interval, wall_clock, Scheduler, TimerCallback, TimerContext, TimerHandle, TimerId,
    TimerIds, TimerKind,
};

/// Worker-thread scheduler configuration.
#[derive(Debug, Clone)]
pub struct ThreadSchedulerConfig {
    /// Max queued registrations before `QueueFull` is returned.
    pub control_queue_capacity: usize,
    /// Longest the worker sleeps with nothing due; cancelled timers are
    /// purged at this cadence.
    pub idle_wait: Duration,
}

impl Default for ThreadSchedulerConfig {
    fn default() -> Self {
        Self {
            control_queue_capacity: 1024,
            idle_wait: Duration::from_millis(50),
        }
    }
}

enum ControlMsg {
    Register {
        id: TimerId,
        due: Duration,
        kind: TimerKind,
        callback: TimerCallback,
        cancelled: Arc<AtomicBool>,
    },
}

/// Real-time scheduler running every callback on one dedicated worker thread.
///
/// Registration is a non-blocking send on a bounded channel. Dropping the
/// scheduler closes that channel and joins the worker; timers still armed at
/// that point never fire.
pub struct ThreadScheduler {
    cfg: ThreadSchedulerConfig,
    control_tx: Mutex<Option<Sender<ControlMsg>>>,
    ids: TimerIds,
    epoch: DateTime<Utc>,
    started: Instant,
    worker: ThreadId,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadScheduler {
    /// Spawns the worker thread.
    pub fn new(cfg: ThreadSchedulerConfig) -> TwinResult<Self> {
        let (control_tx, control_rx) = bounded::<ControlMsg>(cfg.control_queue_capacity.max(1));
        let started = Instant::now();
        let epoch = Utc::now();
        let idle_wait = cfg.idle_wait.max(Duration::from_millis(1));

        let join = thread::Builder::new()
            .name("railtwin-scheduler".to_string())
            .spawn(move || worker_loop(control_rx, started, epoch, idle_wait))
            .map_err(|e| TwinError::internal(format!("failed to spawn scheduler worker: {e}")))?;
        let worker = join.thread().id();

        tracing::debug!("scheduler worker started");

        Ok(Self {
            cfg,
            control_tx: Mutex::new(Some(control_tx)),
            ids: TimerIds::default(),
            epoch,
            started,
            worker,
            join: Mutex::new(Some(join)),
        })
    }

    /// Stops the worker and waits for it to exit. Idempotent.
    ///
    /// Closing the control channel is what stops the worker, so a full queue
    /// cannot hold shutdown up. Calling this from inside a timer callback only
    /// signals the worker; it exits once the callback returns.
    pub fn shutdown(&self) {
        match self.control_tx.lock() {
            Ok(mut tx) => drop(tx.take()),
            Err(poisoned) => drop(poisoned.into_inner().take()),
        }

        let Ok(mut guard) = self.join.lock() else {
            return;
        };
        if let Some(handle) = guard.take() {
            if thread::current().id() == self.worker {
                // Joining ourselves would deadlock; the worker sees the closed channel next.
                drop(handle);
                return;
            }
            if handle.join().is_err() {
                tracing::warn!("scheduler worker panicked");
            }
        }
    }

    fn register(&self, delay: Duration, kind: TimerKind, callback: TimerCallback) -> TwinResult<TimerHandle> {
        let id = self.ids.next();
        let (handle, cancelled) = TimerHandle::new(id);
        let due = self.started.elapsed().saturating_add(delay);

        let disconnected = || {
            TwinError::Execution(ExecutionError::Disconnected {
                path: "scheduler_control".to_string(),
            })
        };
        let guard = self.control_tx.lock().map_err(|_| TwinError::poisoned("scheduler control"))?;
        let Some(tx) = guard.as_ref() else {
            return Err(disconnected());
        };

        match tx.try_send(ControlMsg::Register {
            id,
            due,
            kind,
            callback,
            cancelled,
        }) {
            Ok(()) => Ok(handle),
            Err(TrySendError::Full(_)) => Err(TwinError::Execution(ExecutionError::QueueFull {
                capacity: self.cfg.control_queue_capacity,
            })),
            Err(TrySendError::Disconnected(_)) => Err(disconnected()),
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule_repeating(&self, interval: Duration, callback: TimerCallback) -> TwinResult<TimerHandle> {
        ensure_interval(interval)?;
        self.register(interval, TimerKind::Repeating { interval }, callback)
    }

    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TwinResult<TimerHandle> {
        self.register(delay, TimerKind::Once, callback)
    }

    fn now(&self) -> DateTime<Utc> {
        wall_clock(self.epoch, self.started.elapsed())
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(control_rx: Receiver<ControlMsg>, started: Instant, epoch: DateTime<Utc>, idle_wait: Duration) {
    let mut queue = TimerQueue::default();

    loop {
        let now = started.elapsed();
        while let Some(mut timer) = queue.take_due(now) {
            let ctx = TimerContext::new(timer.id, timer.due, wall_clock(epoch, timer.due));
            timer.fire(&ctx);
            queue.finish(timer);
        }

        let wait = queue
            .next_due()
            .map_or(idle_wait, |due| due.saturating_sub(started.elapsed()).min(idle_wait));

        match control_rx.recv_timeout(wait) {
            Ok(ControlMsg::Register {
                id,
                due,
                kind,
                callback,
                cancelled,
            }) => {
                queue.insert(id, due, kind, callback, cancelled);
            }
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                queue.purge_cancelled();
            }
        }
    }

    tracing::debug!(armed = queue.live(), "scheduler worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fires_repeating_timer_in_real_time() {
        let sched = ThreadScheduler::new(ThreadSchedulerConfig::default()).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let handle = sched
            .schedule_repeating(
                Duration::from_millis(10),
                Box::new(move |_| {
                    h.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        thread::sleep(Duration::from_millis(200));
        handle.cancel();
        let seen = hits.load(Ordering::SeqCst);
        assert!(seen >= 3, "expected several ticks, saw {seen}");

        thread::sleep(Duration::from_millis(60));
        let after = hits.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(60));
        assert_eq!(hits.load(Ordering::SeqCst), after);
    }

    #[test]
    fn shutdown_is_idempotent_and_rejects_new_timers() {
        let sched = ThreadScheduler::new(ThreadSchedulerConfig::default()).unwrap();
        sched.shutdown();
        sched.shutdown();
        let err = sched
            .schedule_once(Duration::from_millis(1), Box::new(|_| {}))
            .unwrap_err();
        assert!(err.is_execution());
    }

    #[test]
    fn drop_with_full_control_queue_returns() {
        let sched = ThreadScheduler::new(ThreadSchedulerConfig {
            control_queue_capacity: 1,
            idle_wait: Duration::from_secs(5),
        })
        .unwrap();
        // Keep registering until the queue reports full so shutdown races a backlog.
        let mut handles = Vec::new();
        for _ in 0..64 {
            match sched.schedule_once(Duration::from_secs(60), Box::new(|_| {})) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    assert!(e.is_execution());
                    break;
                }
            }
        }

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            drop(sched);
            let _ = done_tx.send(());
        });
        assert!(
            done_rx.recv_timeout(Duration::from_secs(2)).is_ok(),
            "dropping the scheduler did not return"
        );
        drop(handles);
    }
}
