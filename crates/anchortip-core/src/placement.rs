#![forbid(unsafe_code)]

//! Placement engine: overlay coordinates for a requested direction, plus
//! viewport-containment fallback.
//!
//! Everything here is a pure function of its inputs. Viewport metrics arrive
//! through [`ViewportMetrics`] so the same code runs against a browser-like
//! host, a terminal, or a test fixture.
//!
//! # Invariants
//!
//! 1. With auto-placement disabled, [`resolve_placement`] returns the
//!    requested direction, whatever the containment result.
//! 2. A fallback result is the *first* candidate of [`Placement::FALLBACK_ORDER`]
//!    whose position fits. Candidates are never scored against each other.
//! 3. When nothing fits, a position is still produced (the previous or the
//!    requested direction, unchecked). Clipping is acceptable; having no
//!    position is not.
//!
//! # Example
//!
//! ```
//! use anchortip_core::geometry::{Anchor, Rect, Size, Viewport};
//! use anchortip_core::placement::{Placement, PlacementRequest, Resolution, resolve_placement};
//!
//! let anchor = Anchor::element(Rect::new(10.0, 50.0, 20.0, 10.0), 0.0);
//! let request = PlacementRequest::new(anchor, Size::new(40.0, 10.0), Placement::Top).offset(8.0);
//! let result = resolve_placement(&request, &Viewport::new(600.0, 800.0, 0.0));
//!
//! // No room above the anchor: the first fitting candidate is bottom-left.
//! assert_eq!(result.placement, Placement::BottomLeft);
//! assert_eq!(result.resolution, Resolution::Fallback);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::geometry::{Anchor, Point, Rect, Size};
use crate::host::ViewportMetrics;
use crate::options::ParseOptionError;

/// Where the overlay sits relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    /// Above the anchor, horizontally centered.
    #[default]
    Top,
    /// Above the anchor, flush with its left edge.
    TopLeft,
    /// Below the anchor, horizontally centered.
    Bottom,
    /// Below the anchor, flush with its left edge.
    BottomLeft,
    /// Left of the anchor, vertically centered.
    Left,
    /// Right of the anchor, vertically centered.
    Right,
}

impl Placement {
    /// Every placement, in declaration order.
    pub const ALL: [Placement; 6] = [
        Placement::Top,
        Placement::TopLeft,
        Placement::Bottom,
        Placement::BottomLeft,
        Placement::Left,
        Placement::Right,
    ];

    /// Candidate order searched when the requested placement is clipped.
    pub const FALLBACK_ORDER: [Placement; 6] = [
        Placement::BottomLeft,
        Placement::Bottom,
        Placement::TopLeft,
        Placement::Left,
        Placement::Top,
        Placement::Right,
    ];

    /// The string spelling used in option files and class names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopLeft => "top-left",
            Self::Bottom => "bottom",
            Self::BottomLeft => "bottom-left",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Placement::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseOptionError::new("placement", s))
    }
}

#[cfg(feature = "config-files")]
impl serde::Serialize for Placement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "config-files")]
impl<'de> serde::Deserialize<'de> for Placement {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Which path of the resolution algorithm produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The requested placement fit, or containment was not checked.
    Requested,
    /// A fallback candidate fit.
    Fallback,
    /// Nothing fit; the position may be clipped by the viewport.
    Clipped,
}

/// Computed overlay position plus the placement actually used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionResult {
    pub position: Point,
    pub placement: Placement,
    pub resolution: Resolution,
}

/// Inputs to one placement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    pub anchor: Anchor,
    pub overlay: Size,
    /// Direction asked for by the configuration.
    pub requested: Placement,
    /// Gap between anchor and overlay.
    pub offset: f64,
    /// Whether to search fallback candidates when the requested one is clipped.
    pub auto_placement: bool,
    /// Direction currently in use, preferred over `requested` when nothing fits.
    pub previous: Option<Placement>,
}

impl PlacementRequest {
    /// Create a request with no offset, auto-placement on, and no previous placement.
    pub fn new(anchor: Anchor, overlay: Size, requested: Placement) -> Self {
        Self {
            anchor,
            overlay,
            requested,
            offset: 0.0,
            auto_placement: true,
            previous: None,
        }
    }

    /// Set the anchor gap.
    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Enable or disable the fallback search.
    #[must_use]
    pub fn auto_placement(mut self, enabled: bool) -> Self {
        self.auto_placement = enabled;
        self
    }

    /// Set the placement currently in use.
    #[must_use]
    pub fn previous(mut self, previous: Option<Placement>) -> Self {
        self.previous = previous;
        self
    }
}

/// Overlay coordinates for one direction.
///
/// Uses the anchor's scroll offset for the vertical axis, and treats fixed
/// anchors as zero-sized.
pub fn compute_position(anchor: &Anchor, overlay: Size, placement: Placement, offset: f64) -> Point {
    let rect = anchor.rect();
    let overlay = overlay.sanitized();
    let offset = if offset.is_finite() { offset } else { 0.0 };
    let top_base = rect.top + anchor.scroll();

    let top = match placement {
        Placement::Top | Placement::TopLeft => top_base - (overlay.height + offset),
        Placement::Bottom | Placement::BottomLeft => top_base + rect.height + offset,
        Placement::Left | Placement::Right => {
            top_base + rect.height / 2.0 - overlay.height / 2.0
        }
    };

    let left = match placement {
        Placement::Top | Placement::Bottom => rect.left + rect.width / 2.0 - overlay.width / 2.0,
        Placement::TopLeft | Placement::BottomLeft => rect.left,
        Placement::Left => rect.left - overlay.width - offset,
        Placement::Right => rect.left + rect.width + offset,
    };

    Point::new(top, left)
}

/// Whether the overlay at `position` lies fully inside the viewport.
pub fn fits<V: ViewportMetrics + ?Sized>(position: Point, overlay: Size, viewport: &V) -> bool {
    let overlay = overlay.sanitized();
    let area = Rect::new(position.top, position.left, overlay.width, overlay.height);

    area.top >= 0.0
        && area.left >= 0.0
        && area.bottom() <= viewport.inner_height() + viewport.scroll_y()
        && area.right() <= viewport.content_width()
}

/// Resolve the placement for one pass.
///
/// 1. Requested placement if it fits, or if auto-placement is off.
/// 2. Otherwise the first fitting candidate of [`Placement::FALLBACK_ORDER`].
/// 3. Otherwise `previous` (or `requested`) without a containment check.
pub fn resolve_placement<V: ViewportMetrics + ?Sized>(
    request: &PlacementRequest,
    viewport: &V,
) -> PositionResult {
    let place = |placement| compute_position(&request.anchor, request.overlay, placement, request.offset);

    let position = place(request.requested);
    if !request.auto_placement || fits(position, request.overlay, viewport) {
        return PositionResult {
            position,
            placement: request.requested,
            resolution: Resolution::Requested,
        };
    }

    for candidate in Placement::FALLBACK_ORDER {
        let position = place(candidate);
        if fits(position, request.overlay, viewport) {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                requested = request.requested.as_str(),
                chosen = candidate.as_str(),
                "placement fell back"
            );
            return PositionResult {
                position,
                placement: candidate,
                resolution: Resolution::Fallback,
            };
        }
    }

    let placement = request.previous.unwrap_or(request.requested);
    #[cfg(feature = "tracing")]
    tracing::trace!(
        requested = request.requested.as_str(),
        chosen = placement.as_str(),
        "no placement fits the viewport, clipping"
    );
    PositionResult {
        position: place(placement),
        placement,
        resolution: Resolution::Clipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Viewport};

    fn anchor() -> Anchor {
        Anchor::element(Rect::new(100.0, 50.0, 20.0, 10.0), 0.0)
    }

    fn overlay() -> Size {
        Size::new(40.0, 10.0)
    }

    fn roomy() -> Viewport {
        Viewport::new(1000.0, 1000.0, 0.0)
    }

    #[test]
    fn top_matches_reference_scenario() {
        let p = compute_position(&anchor(), overlay(), Placement::Top, 8.0);
        assert_eq!(p, Point::new(82.0, 40.0));
    }

    #[test]
    fn formulas_for_every_direction() {
        let a = anchor();
        let o = overlay();
        let expected = [
            (Placement::Top, Point::new(82.0, 40.0)),
            (Placement::TopLeft, Point::new(82.0, 50.0)),
            (Placement::Bottom, Point::new(118.0, 40.0)),
            (Placement::BottomLeft, Point::new(118.0, 50.0)),
            (Placement::Left, Point::new(100.0, 2.0)),
            (Placement::Right, Point::new(100.0, 78.0)),
        ];
        for (placement, point) in expected {
            assert_eq!(compute_position(&a, o, placement, 8.0), point, "{placement}");
        }
    }

    #[test]
    fn scroll_offset_shifts_vertical_axis_only() {
        let a = Anchor::element(Rect::new(100.0, 50.0, 20.0, 10.0), 30.0);
        let p = compute_position(&a, overlay(), Placement::Bottom, 8.0);
        assert_eq!(p, Point::new(148.0, 40.0));
        let p = compute_position(&a, overlay(), Placement::Right, 8.0);
        assert_eq!(p, Point::new(130.0, 78.0));
    }

    #[test]
    fn fixed_anchor_uses_zero_extent() {
        let a = Anchor::fixed(Point::new(100.0, 50.0), 0.0);
        assert_eq!(
            compute_position(&a, overlay(), Placement::Bottom, 8.0),
            Point::new(108.0, 30.0)
        );
        assert_eq!(
            compute_position(&a, overlay(), Placement::Right, 8.0),
            Point::new(95.0, 58.0)
        );
    }

    #[test]
    fn fits_checks_all_four_edges() {
        let vp = Viewport::new(100.0, 100.0, 0.0);
        let size = Size::new(10.0, 10.0);
        assert!(fits(Point::new(0.0, 0.0), size, &vp));
        assert!(fits(Point::new(90.0, 90.0), size, &vp));
        assert!(!fits(Point::new(-0.5, 0.0), size, &vp));
        assert!(!fits(Point::new(0.0, -0.5), size, &vp));
        assert!(!fits(Point::new(90.5, 0.0), size, &vp));
        assert!(!fits(Point::new(0.0, 90.5), size, &vp));
    }

    #[test]
    fn fits_counts_scrolled_height() {
        let vp = Viewport::new(100.0, 100.0, 50.0);
        assert!(fits(Point::new(140.0, 0.0), Size::new(10.0, 10.0), &vp));
        assert!(!fits(Point::new(141.0, 0.0), Size::new(10.0, 10.0), &vp));
    }

    #[test]
    fn requested_placement_kept_when_it_fits() {
        let req = PlacementRequest::new(anchor(), overlay(), Placement::Top).offset(8.0);
        let result = resolve_placement(&req, &roomy());
        assert_eq!(result.placement, Placement::Top);
        assert_eq!(result.resolution, Resolution::Requested);
        assert_eq!(result.position, Point::new(82.0, 40.0));
    }

    #[test]
    fn reference_scenario_with_short_viewport_clips() {
        // Every candidate reaches below y=70, so nothing fits and the
        // requested direction is used unchecked.
        let req = PlacementRequest::new(anchor(), overlay(), Placement::Top).offset(8.0);
        let result = resolve_placement(&req, &Viewport::new(70.0, 1000.0, 0.0));
        assert_eq!(result.resolution, Resolution::Clipped);
        assert_eq!(result.placement, Placement::Top);
        assert_eq!(result.position, Point::new(82.0, 40.0));
    }

    #[test]
    fn falls_back_to_bottom_left_first() {
        let a = Anchor::element(Rect::new(5.0, 50.0, 20.0, 10.0), 0.0);
        let req = PlacementRequest::new(a, overlay(), Placement::Top).offset(8.0);
        let result = resolve_placement(&req, &roomy());
        assert_eq!(result.placement, Placement::BottomLeft);
        assert_eq!(result.resolution, Resolution::Fallback);
        assert_eq!(result.position, Point::new(23.0, 50.0));
    }

    #[test]
    fn fallback_skips_candidates_that_overflow() {
        // Anchor at the bottom-left corner: bottom-* overflow vertically,
        // top is centered and overflows left, so top-left wins.
        let a = Anchor::element(Rect::new(180.0, 0.0, 10.0, 10.0), 0.0);
        let req = PlacementRequest::new(a, overlay(), Placement::Bottom).offset(8.0);
        let result = resolve_placement(&req, &Viewport::new(200.0, 300.0, 0.0));
        assert_eq!(result.placement, Placement::TopLeft);
        assert_eq!(result.position, Point::new(162.0, 0.0));
    }

    #[test]
    fn disabled_auto_placement_never_falls_back() {
        let a = Anchor::element(Rect::new(5.0, 50.0, 20.0, 10.0), 0.0);
        let req = PlacementRequest::new(a, overlay(), Placement::Top)
            .offset(8.0)
            .auto_placement(false);
        let result = resolve_placement(&req, &roomy());
        assert_eq!(result.placement, Placement::Top);
        assert_eq!(result.resolution, Resolution::Requested);
        assert_eq!(result.position.top, -13.0);
    }

    #[test]
    fn clipped_prefers_previous_placement() {
        let req = PlacementRequest::new(anchor(), overlay(), Placement::Top)
            .offset(8.0)
            .previous(Some(Placement::Right));
        let result = resolve_placement(&req, &Viewport::new(10.0, 10.0, 0.0));
        assert_eq!(result.resolution, Resolution::Clipped);
        assert_eq!(result.placement, Placement::Right);
        assert_eq!(result.position, Point::new(100.0, 78.0));
    }

    #[test]
    fn degenerate_inputs_still_produce_a_position() {
        let a = Anchor::element(Rect::new(f64::NAN, 10.0, -5.0, f64::INFINITY), f64::NAN);
        let req = PlacementRequest::new(a, Size::new(f64::NAN, 4.0), Placement::Bottom)
            .offset(f64::INFINITY);
        let result = resolve_placement(&req, &roomy());
        assert!(result.position.is_finite());
    }

    #[test]
    fn parse_and_display_roundtrip() {
        for placement in Placement::ALL {
            assert_eq!(placement.as_str().parse::<Placement>().unwrap(), placement);
            assert_eq!(placement.to_string(), placement.as_str());
        }
        assert!("middle".parse::<Placement>().is_err());
    }

    #[test]
    fn fallback_order_covers_every_placement() {
        for placement in Placement::ALL {
            assert!(Placement::FALLBACK_ORDER.contains(&placement));
        }
    }
}
