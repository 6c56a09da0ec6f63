#![forbid(unsafe_code)]

//! Cancellable one-shot timers keyed by kind.
//!
//! [`TimerArbiter`] holds at most one pending timer per kind. Scheduling a
//! kind supersedes whatever was pending for it, which is how delayed
//! transitions implement "last trigger wins" without queuing.
//!
//! Time is never read from a clock here: callers pass `now` in, and collect
//! due timers with [`pop_due`](TimerArbiter::pop_due).
//!
//! # Invariants
//!
//! 1. At most one pending timer per kind.
//! 2. Each scheduled action is handed out at most once.
//! 3. A timer cancelled (or superseded) before it is popped never fires.
//! 4. Due timers are popped earliest deadline first; equal deadlines pop in
//!    scheduling order.
//!
//! # Example
//!
//! ```
//! use anchortip_runtime::timer::TimerArbiter;
//! use web_time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut timers: TimerArbiter<&str, u32> = TimerArbiter::new();
//! timers.schedule("show", t0, Duration::from_millis(100), 1);
//! timers.schedule("show", t0, Duration::from_millis(150), 2); // supersedes
//!
//! assert!(timers.pop_due(t0 + Duration::from_millis(120)).is_none());
//! let fired = timers.pop_due(t0 + Duration::from_millis(150)).unwrap();
//! assert_eq!(fired.action, 2);
//! ```

use std::fmt;

use web_time::{Duration, Instant};

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// A timer handed out by [`TimerArbiter::pop_due`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<K, A> {
    pub handle: TimerHandle,
    pub kind: K,
    /// When the timer was due. Follow-up timers should be scheduled from here
    /// rather than from the time it was popped.
    pub deadline: Instant,
    pub action: A,
}

#[derive(Debug)]
struct Entry<K, A> {
    handle: TimerHandle,
    kind: K,
    deadline: Instant,
    action: A,
}

/// One-shot timers, one slot per kind.
pub struct TimerArbiter<K, A> {
    entries: Vec<Entry<K, A>>,
    next_id: u64,
}

impl<K: fmt::Debug, A> fmt::Debug for TimerArbiter<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerArbiter")
            .field(
                "pending",
                &self.entries.iter().map(|e| &e.kind).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<K, A> Default for TimerArbiter<K, A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<K: Copy + Eq + fmt::Debug, A> TimerArbiter<K, A> {
    /// Create an empty arbiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire `delay` after `now`, superseding any pending
    /// timer of the same kind.
    ///
    /// A delay too large to represent as an [`Instant`] never fires.
    pub fn schedule(&mut self, kind: K, now: Instant, delay: Duration, action: A) -> TimerHandle {
        self.cancel_kind(kind);

        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let Some(deadline) = now.checked_add(delay) else {
            tracing::trace!(?kind, ?delay, "timer delay out of range, dropped");
            return handle;
        };

        tracing::trace!(?kind, ?delay, "timer scheduled");
        self.entries.push(Entry {
            handle,
            kind,
            deadline,
            action,
        });
        handle
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(index) => {
                let entry = self.entries.remove(index);
                tracing::trace!(kind = ?entry.kind, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel the pending timer of `kind`, if any.
    pub fn cancel_kind(&mut self, kind: K) -> bool {
        match self.entries.iter().position(|e| e.kind == kind) {
            Some(index) => {
                self.entries.remove(index);
                tracing::trace!(?kind, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        if count > 0 {
            tracing::trace!(count, "all timers cancelled");
        }
        self.entries.clear();
        count
    }

    /// Whether a timer of `kind` is pending.
    pub fn is_pending(&self, kind: K) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Action of the pending timer of `kind`.
    pub fn pending_action(&self, kind: K) -> Option<&A> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| &e.action)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    ///
    /// Call repeatedly until it returns `None`. Handling one fired timer may
    /// cancel or schedule others; popping one at a time keeps those
    /// cancellations effective.
    pub fn pop_due(&mut self, now: Instant) -> Option<Fired<K, A>> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.handle))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(index);
        tracing::trace!(kind = ?entry.kind, "timer fired");
        Some(Fired {
            handle: entry.handle,
            kind: entry.kind,
            deadline: entry.deadline,
            action: entry.action,
        })
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
