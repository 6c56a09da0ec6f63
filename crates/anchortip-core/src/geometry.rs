#![forbid(unsafe_code)]

//! Geometric primitives for anchors, overlays, and the viewport.
//!
//! All values are CSS-style pixels in client coordinates (origin at the
//! top-left of the visible area, `top` growing downward). Fractional values
//! are legal; centering divides extents by two.

/// A point in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config-files", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Distance from the top edge.
    pub top: f64,
    /// Distance from the left edge.
    pub left: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.top.is_finite() && self.left.is_finite()
    }
}

/// Width and height of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace non-finite or negative extents with zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            width: non_negative(self.width),
            height: non_negative(self.height),
        }
    }
}

/// A bounding rectangle, as reported for a laid-out trigger element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.top, self.left)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Coerce a degenerate rectangle into defined geometry.
    ///
    /// Non-finite coordinates become `0`, and non-finite or negative extents
    /// become `0`, so an element that has not been laid out yet behaves like a
    /// zero-sized anchor at its reported origin.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            top: finite_or_zero(self.top),
            left: finite_or_zero(self.left),
            width: non_negative(self.width),
            height: non_negative(self.height),
        }
    }
}

/// What the tooltip is positioned against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorShape {
    /// The trigger element's bounding rectangle.
    Element(Rect),
    /// A caller-supplied fixed point. Implies zero width and height.
    Fixed(Point),
}

/// Anchor geometry plus the vertical scroll offset it was measured under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub shape: AnchorShape,
    /// Current vertical scroll offset of the document.
    pub scroll_y: f64,
}

impl Anchor {
    /// Anchor to a laid-out element.
    #[inline]
    pub const fn element(rect: Rect, scroll_y: f64) -> Self {
        Self {
            shape: AnchorShape::Element(rect),
            scroll_y,
        }
    }

    /// Anchor to an explicit point.
    #[inline]
    pub const fn fixed(point: Point, scroll_y: f64) -> Self {
        Self {
            shape: AnchorShape::Fixed(point),
            scroll_y,
        }
    }

    /// Pick the anchor for one placement pass.
    ///
    /// An explicit `position` wins over the element rectangle; a missing
    /// rectangle (element not laid out) degrades to a zero-sized anchor at the
    /// origin.
    pub fn from_parts(position: Option<Point>, rect: Option<Rect>, scroll_y: f64) -> Self {
        match position {
            Some(point) => Self::fixed(point, scroll_y),
            None => Self::element(rect.unwrap_or_default(), scroll_y),
        }
    }

    /// Effective rectangle used by the placement formulas.
    ///
    /// Fixed anchors report zero width and height. The result is always
    /// sanitized.
    pub fn rect(&self) -> Rect {
        match self.shape {
            AnchorShape::Element(rect) => rect.sanitized(),
            AnchorShape::Fixed(point) => Rect::new(point.top, point.left, 0.0, 0.0).sanitized(),
        }
    }

    /// Anchor origin, as reported in lifecycle events.
    pub fn origin(&self) -> Point {
        self.rect().origin()
    }

    /// Scroll offset with non-finite values coerced to zero.
    #[inline]
    pub fn scroll(&self) -> f64 {
        finite_or_zero(self.scroll_y)
    }
}

/// A snapshot of viewport metrics.
///
/// The containment bound is `inner_height + scroll_y`, since overlay
/// coordinates are document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Height of the window's layout viewport.
    pub inner_height: f64,
    /// Width of the document's content box.
    pub content_width: f64,
    /// Current vertical scroll offset.
    pub scroll_y: f64,
}

impl Viewport {
    /// Create a new viewport snapshot.
    #[inline]
    pub const fn new(inner_height: f64, content_width: f64, scroll_y: f64) -> Self {
        Self {
            inner_height,
            content_width,
            scroll_y,
        }
    }
}

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[inline]
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
