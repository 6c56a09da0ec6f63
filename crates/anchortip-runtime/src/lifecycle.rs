#![forbid(unsafe_code)]

//! Lifecycle notifications: `show`, `shown`, `hide`, `hidden`.
//!
//! [`LifecycleEmitter`] delivers each event to every registered listener in
//! registration order, then appends it to a bounded queue that hosts without
//! callbacks can drain.
//!
//! # Failure Modes
//!
//! - **Undrained queue**: once [`DEFAULT_QUEUE_CAPACITY`] events are queued,
//!   the oldest is dropped for each new one. Listeners are unaffected.

use std::collections::VecDeque;
use std::fmt;

use anchortip_core::{Placement, Point};

/// Queued events kept before the oldest is dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Which lifecycle step happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// The overlay became visible and started its enter animation.
    Show,
    /// The enter animation settled.
    Shown,
    /// The overlay started hiding.
    Hide,
    /// The exit animation settled.
    Hidden,
}

impl LifecycleKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Shown => "shown",
            Self::Hide => "hide",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleEvent {
    pub kind: LifecycleKind,
    /// Origin of the anchor at the time of the event.
    pub position: Point,
    /// Placement in use, if the overlay has been placed.
    pub placement: Option<Placement>,
}

/// Registration token returned by [`LifecycleEmitter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&LifecycleEvent) + Send>;

/// Fans lifecycle events out to listeners and a drainable queue.
pub struct LifecycleEmitter {
    listeners: Vec<(ListenerId, Listener)>,
    queue: VecDeque<LifecycleEvent>,
    capacity: usize,
    next_id: u64,
}

impl fmt::Debug for LifecycleEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleEmitter")
            .field("listeners", &self.listeners.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl Default for LifecycleEmitter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl LifecycleEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an emitter whose queue holds at most `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            listeners: Vec::new(),
            queue: VecDeque::new(),
            capacity,
            next_id: 0,
        }
    }

    /// Register a listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&LifecycleEvent) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener, then queue it.
    pub fn emit(&mut self, event: LifecycleEvent) {
        tracing::debug!(
            kind = event.kind.as_str(),
            placement = event.placement.map(Placement::as_str),
            "lifecycle event"
        );
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        if self.capacity == 0 {
            return;
        }
        if self.queue.len() == self.capacity {
            self.queue.pop_front();
        }
        self.queue.push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<LifecycleEvent> {
        self.queue.drain(..).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
