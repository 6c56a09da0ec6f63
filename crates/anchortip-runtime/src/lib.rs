#![forbid(unsafe_code)]

//! AnchorTip Runtime
//!
//! Stateful half of AnchorTip: the per-instance visibility state machine and
//! the timing machinery under it.
//!
//! # Key Components
//!
//! - [`VisibilityController`] - Show/hide state machine for one tooltip
//! - [`TimerArbiter`] - One-shot timers, one slot per kind, last trigger wins
//! - [`RepositionThrottle`] - Audit-style rate limiter for scroll/resize
//! - [`LifecycleEmitter`] - `show`/`shown`/`hide`/`hidden` fan-out
//! - [`driver::spawn`] - Run a controller on its own thread
//!
//! # How it fits in the system
//! The controller consumes [`anchortip_core::TriggerEvent`] values from the
//! host, reads geometry through the [`anchortip_core::TooltipHost`] traits,
//! and calls [`anchortip_core::resolve_placement`] whenever it places the
//! overlay. All timing is driven by the `now` passed in, so a host can run it
//! from its own event loop, from virtual time in tests, or through the
//! threaded [`driver`].

pub mod controller;
pub mod driver;
pub mod lifecycle;
pub mod reposition;
pub mod timer;

pub use controller::{
    ControllerConfig, Overlay, OverlayPhase, VisibilityController, VisibilityState,
};
pub use driver::{DriverCommand, DriverHandle};
pub use lifecycle::{LifecycleEmitter, LifecycleEvent, LifecycleKind, ListenerId};
pub use reposition::{DEFAULT_REPOSITION_INTERVAL, RepositionThrottle};
pub use timer::{Fired, TimerArbiter, TimerHandle};
