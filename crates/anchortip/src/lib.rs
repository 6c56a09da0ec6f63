#![forbid(unsafe_code)]

//! AnchorTip public facade crate.
//!
//! Re-exports the placement engine, option layers and visibility controller
//! from the internal crates, and offers a prelude for day-to-day usage.
//!
//! ```
//! use anchortip::prelude::*;
//!
//! let anchor = Anchor::element(Rect::new(100.0, 50.0, 20.0, 10.0), 0.0);
//! let request = PlacementRequest::new(anchor, Size::new(40.0, 10.0), Placement::Top).offset(8.0);
//! let result = resolve_placement(&request, &Viewport::new(600.0, 800.0, 0.0));
//! assert_eq!(result.position, Point::new(82.0, 40.0));
//! ```

// --- Core re-exports -------------------------------------------------------

pub use anchortip_core::{
    Anchor, AnchorProvider, AnchorShape, Configuration, ContentProvider, ContentType,
    DeviceProvider, DeviceTraits, OptionLayers, OptionsError, OverlayMeasure, ParseOptionError,
    Placement, PlacementRequest, Point, PointerEvents, PositionResult, Rect, Resolution, Size,
    Theme, TooltipHost, TooltipOptions, Trigger, TriggerEvent, Viewport, ViewportMetrics,
    compute_position, fits, resolve, resolve_placement,
};

// --- Runtime re-exports ----------------------------------------------------

pub use anchortip_runtime::{
    ControllerConfig, DriverCommand, DriverHandle, LifecycleEvent, LifecycleKind, ListenerId,
    Overlay, OverlayPhase, VisibilityController, VisibilityState,
};

// --- Errors ---------------------------------------------------------------

pub mod error;

pub use error::{Error, Result};

// --- Conveniences ---------------------------------------------------------

/// Load one option layer from a file, picking JSON for `.json` and TOML
/// otherwise.
#[cfg(feature = "config-files")]
pub fn load_options(path: impl AsRef<std::path::Path>) -> Result<TooltipOptions> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let options = if is_json {
        TooltipOptions::from_json_file(path)?
    } else {
        TooltipOptions::from_toml_file(path)?
    };
    Ok(options)
}

/// Run `controller` on a dedicated driver thread.
pub fn spawn<H>(controller: VisibilityController<H>) -> Result<DriverHandle<H>>
where
    H: TooltipHost + Send + 'static,
{
    Ok(anchortip_runtime::driver::spawn(controller)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Anchor, Configuration, ContentType, ControllerConfig, DeviceTraits, Error, LifecycleEvent,
        LifecycleKind, OptionLayers, Placement, PlacementRequest, Point, PositionResult, Rect,
        Result, Size, TooltipHost, TooltipOptions, Trigger, TriggerEvent, Viewport,
        VisibilityController, VisibilityState, resolve_placement,
    };

    pub use crate::{core, runtime};
}

pub use anchortip_core as core;
pub use anchortip_runtime as runtime;
