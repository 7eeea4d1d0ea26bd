#![forbid(unsafe_code)]

//! Host-driven timers.
//!
//! The page runs on the browser's single-threaded event loop; timers are
//! deadlines the host checks whenever it hands control back to the runtime.
//! [`Scheduler`] is the seam: [`TimerQueue`] is the virtual implementation
//! used both in the browser (fed by `requestAnimationFrame` timestamps) and
//! in tests (fed by a deterministic clock).
//!
//! # Invariants
//!
//! 1. `take_due(now)` returns tasks in deadline order; equal deadlines fire
//!    in scheduling order.
//! 2. A cancelled timer never fires.
//! 3. A fired timer is removed; it fires at most once.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Work a timer triggers when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Clear the scrolling flag after the idle timeout.
    ScrollIdle,
    /// Advance the boot sequence to its next stage.
    BootStage,
}

/// Deadline-based timer source.
pub trait Scheduler {
    /// Schedule `task` to fire once `deadline` is reached.
    fn schedule(&mut self, deadline: Duration, task: TimerTask) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, id: TimerId);

    /// Remove and return every task due at `now`.
    fn take_due(&mut self, now: Duration) -> Vec<TimerTask>;

    /// Number of pending timers.
    fn pending(&self) -> usize;

    /// Earliest pending deadline.
    fn next_deadline(&self) -> Option<Duration>;
}

/// Virtual timer queue ordered by `(deadline, id)`.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: BTreeMap<(Duration, TimerId), TimerTask>,
    deadlines: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.deadlines.clear();
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, deadline: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(deadline) = self.deadlines.remove(&id) {
            self.entries.remove(&(deadline, id));
        }
    }

    fn take_due(&mut self, now: Duration) -> Vec<TimerTask> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.first_entry() {
            let (deadline, id) = *entry.key();
            if deadline > now {
                break;
            }
            due.push(entry.remove());
            self.deadlines.remove(&id);
        }
        due
    }

    fn pending(&self) -> usize {
        self.entries.len()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }
}
