//! Benchmark: placement resolution paths.
//!
//! Run with: `cargo bench -p anchortip-core --bench placement_bench`
//!
//! Resolution runs on every scroll/resize tick while a tooltip is visible,
//! so the interesting cases are the cheap accept, the full fallback scan,
//! and the clipped worst case.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use anchortip_core::{
    Anchor, OptionLayers, Placement, PlacementRequest, Rect, Size, TooltipOptions, Viewport,
    resolve_placement,
};

fn request(anchor_top: f64) -> PlacementRequest {
    PlacementRequest::new(
        Anchor::element(Rect::new(anchor_top, 50.0, 20.0, 10.0), 0.0),
        Size::new(100.0, 10.0),
        Placement::Top,
    )
    .offset(8.0)
}

// ===========================================================================
// Placement resolution
// ===========================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_placement");
    let viewport = Viewport::new(600.0, 800.0, 0.0);

    let accepted = request(100.0);
    group.bench_function("requested_fits", |b| {
        b.iter(|| black_box(resolve_placement(black_box(&accepted), &viewport)));
    });

    // Top overflows; bottom-left is the first fallback.
    let fallback = request(5.0);
    group.bench_function("first_fallback", |b| {
        b.iter(|| black_box(resolve_placement(black_box(&fallback), &viewport)));
    });

    // Nothing fits a viewport narrower than the overlay.
    let narrow = Viewport::new(600.0, 40.0, 0.0);
    let clipped = request(100.0).previous(Some(Placement::Right));
    group.bench_function("clipped", |b| {
        b.iter(|| black_box(resolve_placement(black_box(&clipped), &narrow)));
    });

    group.finish();
}

// ===========================================================================
// Option layering
// ===========================================================================

fn bench_options(c: &mut Criterion) {
    let layers = OptionLayers::new()
        .global(TooltipOptions::new().theme(anchortip_core::Theme::Dark).show_delay(50u64))
        .instance(TooltipOptions::new().placement(Placement::Bottom).tooltip_class("hint wide"))
        .overrides(TooltipOptions::new().offset(4.0));

    c.bench_function("options/resolve_layers", |b| {
        b.iter(|| black_box(black_box(&layers).resolve()));
    });
}

criterion_group!(benches, bench_resolve, bench_options);
criterion_main!(benches);
