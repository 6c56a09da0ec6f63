#![no_main]

use anchortip_core::{
    Anchor, Placement, PlacementRequest, Point, Rect, Resolution, Size, Viewport, fits,
    resolve_placement,
};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    anchor: [f64; 4],
    fixed: Option<[f64; 2]>,
    scroll_y: f64,
    overlay: [f64; 2],
    viewport: [f64; 3],
    requested: u8,
    previous: Option<u8>,
    offset: f64,
    auto_placement: bool,
}

fn placement(index: u8) -> Placement {
    Placement::ALL[usize::from(index) % Placement::ALL.len()]
}

fuzz_target!(|input: Input| {
    let [top, left, width, height] = input.anchor;
    let anchor = Anchor::from_parts(
        input.fixed.map(|[t, l]| Point::new(t, l)),
        Some(Rect::new(top, left, width, height)),
        input.scroll_y,
    );
    let overlay = Size::new(input.overlay[0], input.overlay[1]);
    let viewport = Viewport::new(input.viewport[0], input.viewport[1], input.viewport[2]);
    let request = PlacementRequest::new(anchor, overlay, placement(input.requested))
        .offset(input.offset)
        .auto_placement(input.auto_placement)
        .previous(input.previous.map(placement));

    let result = resolve_placement(&request, &viewport);

    // Post-conditions that must always hold:
    match result.resolution {
        Resolution::Requested => assert_eq!(result.placement, request.requested),
        Resolution::Fallback => assert!(fits(result.position, overlay, &viewport)),
        Resolution::Clipped => {
            assert_eq!(result.placement, request.previous.unwrap_or(request.requested));
        }
    }
    if !input.auto_placement {
        assert_eq!(result.resolution, Resolution::Requested);
    }
    assert_eq!(result, resolve_placement(&request, &viewport), "not deterministic");
});
