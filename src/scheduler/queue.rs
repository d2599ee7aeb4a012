use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{TimerCallback, TimerContext, TimerId, TimerKind};

struct Slot {
    kind: TimerKind,
    callback: TimerCallback,
    cancelled: Arc<AtomicBool>,
}

/// A timer taken out of the queue because it is due.
///
/// The driver runs it without holding any lock, then hands it back through
/// [`TimerQueue::finish`] so repeating timers are re-armed.
pub(crate) struct DueTimer {
    pub(crate) id: TimerId,
    pub(crate) due: Duration,
    kind: TimerKind,
    callback: TimerCallback,
    cancelled: Arc<AtomicBool>,
}

impl DueTimer {
    pub(crate) fn fire(&mut self, ctx: &TimerContext) {
        // Cancellation may land between take_due and fire.
        if !self.cancelled.load(Ordering::Acquire) {
            (self.callback)(ctx);
        }
    }
}

/// Armed timers ordered by `(due, registration sequence)`.
///
/// Cancelled timers are dropped lazily when they reach the front.
#[derive(Default)]
pub(crate) struct TimerQueue {
    heap: BinaryHeap<Reverse<(Duration, u64, TimerId)>>,
    slots: HashMap<TimerId, Slot>,
    seq: u64,
}

impl TimerQueue {
    pub(crate) fn insert(
        &mut self,
        id: TimerId,
        due: Duration,
        kind: TimerKind,
        callback: TimerCallback,
        cancelled: Arc<AtomicBool>,
    ) {
        self.seq += 1;
        self.heap.push(Reverse((due, self.seq, id)));
        self.slots.insert(
            id,
            Slot {
                kind,
                callback,
                cancelled,
            },
        );
    }

    /// Removes and returns the earliest live timer due at or before `now`.
    pub(crate) fn take_due(&mut self, now: Duration) -> Option<DueTimer> {
        loop {
            let Reverse((due, _, id)) = *self.heap.peek()?;
            if due > now {
                return None;
            }
            self.heap.pop();
            let Some(slot) = self.slots.remove(&id) else {
                continue;
            };
            if slot.cancelled.load(Ordering::Acquire) {
                continue;
            }
            return Some(DueTimer {
                id,
                due,
                kind: slot.kind,
                callback: slot.callback,
                cancelled: slot.cancelled,
            });
        }
    }

    /// Re-arms a repeating timer at a fixed cadence from its due time.
    pub(crate) fn finish(&mut self, timer: DueTimer) {
        if let TimerKind::Repeating { interval } = timer.kind {
            if !timer.cancelled.load(Ordering::Acquire) {
                let next = timer.due.saturating_add(interval);
                self.insert(timer.id, next, timer.kind, timer.callback, timer.cancelled);
            }
        }
    }

    pub(crate) fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse((due, _, _))| *due)
    }

    pub(crate) fn purge_cancelled(&mut self) {
        self.slots.retain(|_, slot| !slot.cancelled.load(Ordering::Acquire));
        let slots = &self.slots;
        self.heap.retain(|Reverse((_, _, id))| slots.contains_key(id));
    }

    /// Number of timers that can still fire.
    pub(crate) fn live(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| !slot.cancelled.load(Ordering::Acquire))
            .count()
    }
}
