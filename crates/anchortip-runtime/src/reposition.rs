#![forbid(unsafe_code)]

//! Rate limiting for scroll/resize driven re-placement.
//!
//! Scroll and resize arrive in floods. [`RepositionThrottle`] uses audit
//! semantics: the first signal opens a window of `interval`, later signals in
//! the window are absorbed, and a single re-placement is due when the window
//! closes. The latest geometry wins because it is read at that point, not
//! when the signal arrived.
//!
//! ```
//! use anchortip_runtime::reposition::RepositionThrottle;
//! use web_time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut throttle = RepositionThrottle::new(Duration::from_millis(100));
//! throttle.signal(t0);
//! throttle.signal(t0 + Duration::from_millis(40));
//! assert!(!throttle.poll(t0 + Duration::from_millis(99)));
//! assert!(throttle.poll(t0 + Duration::from_millis(100)));
//! assert!(!throttle.poll(t0 + Duration::from_millis(500)));
//! ```

use web_time::{Duration, Instant};

/// Default audit window.
pub const DEFAULT_REPOSITION_INTERVAL: Duration = Duration::from_millis(100);

/// Audit-style rate limiter for viewport-change signals.
#[derive(Debug, Clone)]
pub struct RepositionThrottle {
    interval: Duration,
    window_end: Option<Instant>,
    coalesced: u32,
}

impl Default for RepositionThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_REPOSITION_INTERVAL)
    }
}

impl RepositionThrottle {
    /// Create a throttle with the given window.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_end: None,
            coalesced: 0,
        }
    }

    /// The audit window.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Record a signal. Returns `true` if it opened a new window.
    pub fn signal(&mut self, now: Instant) -> bool {
        if self.window_end.is_some() {
            self.coalesced = self.coalesced.saturating_add(1);
            return false;
        }
        self.window_end = Some(now.checked_add(self.interval).unwrap_or(now));
        self.coalesced = 0;
        true
    }

    /// When the open window closes.
    pub fn deadline(&self) -> Option<Instant> {
        self.window_end
    }

    /// Whether a window is open.
    pub fn is_pending(&self) -> bool {
        self.window_end.is_some()
    }

    /// Close the window if it has elapsed. Returns `true` when a re-placement
    /// is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.window_end {
            Some(end) if end <= now => {
                if self.coalesced > 0 {
                    tracing::trace!(coalesced = self.coalesced, "reposition signals coalesced");
                }
                self.window_end = None;
                self.coalesced = 0;
                true
            }
            _ => false,
        }
    }

    /// Drop any open window without firing.
    pub fn cancel(&mut self) {
        self.window_end = None;
        self.coalesced = 0;
    }
}
