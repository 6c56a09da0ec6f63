#![forbid(unsafe_code)]

//! Core: anchor geometry, placement resolution, layered options, and the
//! trigger vocabulary.
//!
//! # Role in AnchorTip
//! `anchortip-core` is the pure layer. Nothing in here owns a clock, a thread,
//! or mutable state across calls; every function maps its inputs to a
//! deterministic output so it can be tested without a rendering surface.
//!
//! # Primary responsibilities
//! - **Placement**: per-direction coordinate formulas and the
//!   viewport-containment fallback search ([`placement::resolve_placement`]).
//! - **Options**: the layered option merge that produces one effective
//!   [`options::Configuration`] per tooltip instance.
//! - **Host capabilities**: the traits a host implements to hand over anchor
//!   geometry, viewport metrics, overlay size, content presence, and device
//!   class ([`host`]).
//!
//! # How it fits in the system
//! `anchortip-runtime` owns the visibility state machine and its timers. It
//! consumes [`event::TriggerEvent`] values, asks the host for geometry through
//! the [`host`] traits, and calls into [`placement`] whenever the overlay
//! becomes visible or the viewport changes.

pub mod event;
pub mod geometry;
pub mod host;
pub mod options;
pub mod placement;

pub use event::TriggerEvent;
pub use geometry::{Anchor, AnchorShape, Point, Rect, Size, Viewport};
pub use host::{
    AnchorProvider, ContentProvider, DeviceProvider, DeviceTraits, OverlayMeasure, TooltipHost,
    ViewportMetrics,
};
pub use options::{
    Configuration, ContentType, OptionLayers, OptionsError, ParseOptionError, PointerEvents, Theme,
    TooltipOptions, Trigger, resolve,
};
pub use placement::{
    Placement, PlacementRequest, PositionResult, Resolution, compute_position, fits,
    resolve_placement,
};
