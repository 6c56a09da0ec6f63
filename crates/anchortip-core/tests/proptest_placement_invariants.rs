//! Property-based invariant tests for placement resolution.
//!
//! 1. With auto-placement off the requested placement is always used
//! 2. A requested placement that fits is never replaced
//! 3. A fallback result fits, and no earlier candidate fits
//! 4. A clipped result means no candidate fits at all
//! 5. Positions are always finite, even for degenerate geometry
//! 6. Resolution is deterministic

use anchortip_core::{
    Anchor, Placement, PlacementRequest, Point, Rect, Resolution, Size, Viewport,
    compute_position, fits, resolve_placement,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn placement_strategy() -> impl Strategy<Value = Placement> {
    prop::sample::select(Placement::ALL.to_vec())
}

fn anchor_strategy() -> impl Strategy<Value = Anchor> {
    let rect = (
        -50.0f64..900.0,
        -50.0f64..900.0,
        0.0f64..200.0,
        0.0f64..200.0,
    )
        .prop_map(|(top, left, width, height)| Rect::new(top, left, width, height));
    let point = (-50.0f64..900.0, -50.0f64..900.0).prop_map(|(top, left)| Point::new(top, left));
    (
        prop_oneof![
            rect.prop_map(|r| (None, Some(r))),
            point.prop_map(|p| (Some(p), None)),
        ],
        0.0f64..400.0,
    )
        .prop_map(|((position, rect), scroll_y)| Anchor::from_parts(position, rect, scroll_y))
}

fn size_strategy() -> impl Strategy<Value = Size> {
    (0.0f64..300.0, 0.0f64..300.0).prop_map(|(w, h)| Size::new(w, h))
}

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (50.0f64..1000.0, 50.0f64..1000.0, 0.0f64..400.0)
        .prop_map(|(h, w, s)| Viewport::new(h, w, s))
}

fn request_strategy() -> impl Strategy<Value = PlacementRequest> {
    (
        anchor_strategy(),
        size_strategy(),
        placement_strategy(),
        0.0f64..24.0,
        proptest::option::of(placement_strategy()),
    )
        .prop_map(|(anchor, overlay, requested, offset, previous)| {
            PlacementRequest::new(anchor, overlay, requested)
                .offset(offset)
                .previous(previous)
        })
}

/// Requests whose requested placement fits by construction.
///
/// The anchor stays far enough from the document origin that every
/// direction lands at non-negative coordinates; the viewport is then sized
/// to hold the requested position plus the overlay with some slack.
fn fitting_case_strategy() -> impl Strategy<Value = (PlacementRequest, Viewport)> {
    let anchor = (
        350.0f64..600.0,
        350.0f64..600.0,
        0.0f64..200.0,
        0.0f64..200.0,
        0.0f64..400.0,
    )
        .prop_map(|(top, left, width, height, scroll_y)| {
            Anchor::element(Rect::new(top, left, width, height), scroll_y)
        });
    (
        anchor,
        size_strategy(),
        placement_strategy(),
        0.0f64..24.0,
        proptest::option::of(placement_strategy()),
    )
        .prop_flat_map(|(anchor, overlay, requested, offset, previous)| {
            let request = PlacementRequest::new(anchor, overlay, requested)
                .offset(offset)
                .previous(previous);
            let position = compute_position(&anchor, overlay, requested, offset);
            (0.0f64..400.0, 1.0f64..200.0, 1.0f64..200.0).prop_map(
                move |(scroll_y, slack_h, slack_w)| {
                    let height = (position.top + overlay.height - scroll_y).max(0.0) + slack_h;
                    let width = position.left + overlay.width + slack_w;
                    (request, Viewport::new(height, width, scroll_y))
                },
            )
        })
}

fn candidate_fits(request: &PlacementRequest, placement: Placement, viewport: &Viewport) -> bool {
    let position = compute_position(&request.anchor, request.overlay, placement, request.offset);
    fits(position, request.overlay, viewport)
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Requested placement
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn auto_off_keeps_requested(req in request_strategy(), vp in viewport_strategy()) {
        let req = req.auto_placement(false);
        let result = resolve_placement(&req, &vp);
        prop_assert_eq!(result.placement, req.requested);
        prop_assert_eq!(result.resolution, Resolution::Requested);
        prop_assert_eq!(
            result.position,
            compute_position(&req.anchor, req.overlay, req.requested, req.offset)
        );
    }

    #[test]
    fn fitting_request_is_never_replaced((req, vp) in fitting_case_strategy()) {
        prop_assert!(candidate_fits(&req, req.requested, &vp));
        let result = resolve_placement(&req, &vp);
        prop_assert_eq!(result.placement, req.requested);
        prop_assert_eq!(result.resolution, Resolution::Requested);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3-4. Fallback and clipping
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn resolution_matches_candidate_scan(req in request_strategy(), vp in viewport_strategy()) {
        let result = resolve_placement(&req, &vp);
        match result.resolution {
            Resolution::Requested => {
                prop_assert!(candidate_fits(&req, req.requested, &vp));
            }
            Resolution::Fallback => {
                prop_assert!(!candidate_fits(&req, req.requested, &vp));
                prop_assert!(fits(result.position, req.overlay, &vp));
                let index = Placement::FALLBACK_ORDER
                    .iter()
                    .position(|p| *p == result.placement);
                prop_assert!(index.is_some());
                for earlier in &Placement::FALLBACK_ORDER[..index.unwrap_or(0)] {
                    prop_assert!(!candidate_fits(&req, *earlier, &vp), "{earlier} fits first");
                }
            }
            Resolution::Clipped => {
                for candidate in Placement::ALL {
                    prop_assert!(!candidate_fits(&req, candidate, &vp), "{candidate} fits");
                }
                prop_assert_eq!(result.placement, req.previous.unwrap_or(req.requested));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5-6. Robustness and determinism
// ═══════════════════════════════════════════════════════════════════════

fn wild_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -1e6f64..1e6,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn degenerate_geometry_yields_finite_position(
        top in wild_f64(),
        left in wild_f64(),
        width in wild_f64(),
        height in wild_f64(),
        overlay_w in wild_f64(),
        overlay_h in wild_f64(),
        offset in wild_f64(),
        requested in placement_strategy(),
    ) {
        let req = PlacementRequest::new(
            Anchor::element(Rect::new(top, left, width, height), 0.0),
            Size::new(overlay_w, overlay_h),
            requested,
        )
        .offset(offset);
        let result = resolve_placement(&req, &Viewport::new(600.0, 800.0, 0.0));
        prop_assert!(result.position.is_finite());
    }

    #[test]
    fn resolution_is_deterministic(req in request_strategy(), vp in viewport_strategy()) {
        prop_assert_eq!(resolve_placement(&req, &vp), resolve_placement(&req, &vp));
    }
}
