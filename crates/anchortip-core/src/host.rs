#![forbid(unsafe_code)]

//! Host capabilities consumed by the placement engine and the controller.
//!
//! A host (browser bridge, terminal app, test fixture) implements these traits
//! to hand over the bits of its environment the tooltip engine needs. Nothing
//! here queries a global; every measurement is asked for explicitly.

use bitflags::bitflags;

use crate::geometry::{Rect, Size, Viewport};
use crate::options::ContentType;

bitflags! {
    /// Device classes that gate display and select touch-specific delays.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceTraits: u8 {
        /// Primary pointer is coarse (touch input).
        const TOUCHSCREEN = 0b0000_0001;
        /// Handheld form factor.
        const MOBILE      = 0b0000_0010;
    }
}

/// Current geometry of the trigger element.
pub trait AnchorProvider {
    /// Bounding rectangle in client coordinates, or `None` if the element has
    /// not been laid out.
    fn anchor_rect(&self) -> Option<Rect>;
}

/// Viewport measurements used by the containment test.
pub trait ViewportMetrics {
    /// Height of the layout viewport.
    fn inner_height(&self) -> f64;
    /// Width of the document's content box.
    fn content_width(&self) -> f64;
    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f64;
}

impl ViewportMetrics for Viewport {
    #[inline]
    fn inner_height(&self) -> f64 {
        self.inner_height
    }

    #[inline]
    fn content_width(&self) -> f64 {
        self.content_width
    }

    #[inline]
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
}

/// Presence of tooltip content, per content type.
pub trait ContentProvider {
    /// Whether the payload for `content_type` is non-empty.
    fn has_content(&self, content_type: ContentType) -> bool;
}

/// Rendered size of the overlay.
pub trait OverlayMeasure {
    fn overlay_size(&self) -> Size;
}

/// Device classification.
pub trait DeviceProvider {
    fn device(&self) -> DeviceTraits {
        DeviceTraits::empty()
    }
}

/// Everything the visibility controller needs from its host.
pub trait TooltipHost:
    AnchorProvider + ViewportMetrics + ContentProvider + OverlayMeasure + DeviceProvider
{
    /// Snapshot the viewport metrics.
    fn viewport(&self) -> Viewport {
        Viewport::new(self.inner_height(), self.content_width(), self.scroll_y())
    }
}

impl<T> TooltipHost for T where
    T: AnchorProvider + ViewportMetrics + ContentProvider + OverlayMeasure + DeviceProvider
{
}
