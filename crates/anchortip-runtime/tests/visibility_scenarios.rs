#![forbid(unsafe_code)]

//! End-to-end visibility scenarios driven by virtual time.
//!
//! Run:
//!   cargo test -p anchortip-runtime --test visibility_scenarios

use anchortip_core::{
    AnchorProvider, ContentProvider, ContentType, DeviceProvider, DeviceTraits, OptionLayers,
    OverlayMeasure, Placement, Point, Rect, Size, TooltipOptions, Trigger, TriggerEvent,
    ViewportMetrics,
};
use anchortip_runtime::{
    ControllerConfig, LifecycleKind, OverlayPhase, VisibilityController, VisibilityState,
};
use proptest::prelude::*;
use web_time::{Duration, Instant};

// ── Fixture ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Page {
    rect: Option<Rect>,
    scroll_y: f64,
    device: DeviceTraits,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            rect: Some(Rect::new(100.0, 50.0, 20.0, 10.0)),
            scroll_y: 0.0,
            device: DeviceTraits::empty(),
        }
    }
}

impl AnchorProvider for Page {
    fn anchor_rect(&self) -> Option<Rect> {
        self.rect
    }
}

impl ViewportMetrics for Page {
    fn inner_height(&self) -> f64 {
        600.0
    }
    fn content_width(&self) -> f64 {
        800.0
    }
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
}

impl ContentProvider for Page {
    fn has_content(&self, content_type: ContentType) -> bool {
        content_type == ContentType::String
    }
}

impl OverlayMeasure for Page {
    fn overlay_size(&self) -> Size {
        Size::new(40.0, 10.0)
    }
}

impl DeviceProvider for Page {
    fn device(&self) -> DeviceTraits {
        self.device
    }
}

fn controller(options: TooltipOptions) -> VisibilityController<Page> {
    VisibilityController::new(Page::default(), OptionLayers::new().instance(options))
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn kinds(c: &mut VisibilityController<Page>) -> Vec<LifecycleKind> {
    c.drain_events().into_iter().map(|e| e.kind).collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Placement on show
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn reference_anchor_places_above() {
    let t0 = Instant::now();
    let mut c = controller(TooltipOptions::new());
    c.show(t0);
    let overlay = c.overlay().unwrap();
    assert_eq!(overlay.position(), Point::new(82.0, 40.0));
    assert_eq!(overlay.placement(), Placement::Top);
}

#[test]
fn explicit_position_overrides_element() {
    let t0 = Instant::now();
    let mut c = controller(
        TooltipOptions::new()
            .placement(Placement::BottomLeft)
            .position(Point::new(200.0, 300.0)),
    );
    c.show(t0);
    assert_eq!(c.overlay().unwrap().position(), Point::new(208.0, 300.0));
    assert_eq!(c.drain_events()[0].position, Point::new(200.0, 300.0));
}

#[test]
fn scroll_offset_shifts_overlay() {
    let t0 = Instant::now();
    let mut c = VisibilityController::new(
        Page {
            scroll_y: 40.0,
            ..Page::default()
        },
        OptionLayers::new(),
    );
    c.show(t0);
    assert_eq!(c.overlay().unwrap().position(), Point::new(122.0, 40.0));
}

#[test]
fn missing_geometry_still_shows() {
    let t0 = Instant::now();
    let mut c = VisibilityController::new(
        Page {
            rect: None,
            ..Page::default()
        },
        OptionLayers::new(),
    );
    c.show(t0);
    assert_eq!(c.state(), VisibilityState::Visible);
    assert!(c.overlay().unwrap().position().is_finite());
}

#[test]
fn content_type_without_payload_never_shows() {
    let t0 = Instant::now();
    let mut c = controller(TooltipOptions::new().content_type(ContentType::Html));
    c.handle(TriggerEvent::PointerEnter, t0);
    assert_eq!(c.state(), VisibilityState::Hidden);
}

// ═══════════════════════════════════════════════════════════════════════
// Debounce and last-trigger-wins
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn repeated_show_trigger_restarts_delay() {
    let t0 = Instant::now();
    let mut c = controller(TooltipOptions::new().show_delay(200u64));
    c.handle(TriggerEvent::PointerEnter, t0);
    c.handle(TriggerEvent::FocusIn, t0 + ms(150));

    c.advance(t0 + ms(200));
    assert_eq!(c.state(), VisibilityState::AwaitingShow);
    c.advance(t0 + ms(350));
    assert_eq!(c.state(), VisibilityState::Visible);
    c.advance(t0 + ms(2000));
    assert_eq!(kinds(&mut c), vec![LifecycleKind::Show, LifecycleKind::Shown]);
}

#[test]
fn show_while_visible_is_a_no_op() {
    let t0 = Instant::now();
    let mut c = controller(TooltipOptions::new());
    c.show(t0);
    c.advance(t0 + ms(300));
    c.drain_events();
    let deadline = c.next_deadline();

    c.show(t0 + ms(400));
    c.handle(TriggerEvent::PointerEnter, t0 + ms(410));
    assert!(kinds(&mut c).is_empty());
    assert_eq!(c.next_deadline(), deadline);
    assert_eq!(c.state(), VisibilityState::Visible);
}

#[test]
fn hide_when_hidden_is_a_no_op() {
    let t0 = Instant::now();
    let mut c = controller(TooltipOptions::new());
    c.hide(t0);
    c.handle(TriggerEvent::PointerLeave, t0);
    assert_eq!(c.state(), VisibilityState::Hidden);
    assert_eq!(c.next_deadline(), None);
}

#[test]
fn display_false_never_leaves_hidden() {
    let t0 = Instant::now();
    let mut c = controller(TooltipOptions::new().display(false));
    c.show(t0);
    c.handle(TriggerEvent::PointerEnter, t0 + ms(10));
    c.handle(TriggerEvent::FocusIn, t0 + ms(20));
    c.advance(t0 + ms(5000));
    assert_eq!(c.state(), VisibilityState::Hidden);
    assert!(kinds(&mut c).is_empty());
    assert!(c.overlay().is_none());
}

#[test]
fn mobile_gate_blocks_show() {
    let t0 = Instant::now();
    let mut c = VisibilityController::new(
        Page {
            device: DeviceTraits::MOBILE,
            ..Page::default()
        },
        OptionLayers::new().global(TooltipOptions::new().display_mobile(false)),
    );
    c.show(t0);
    assert_eq!(c.state(), VisibilityState::Hidden);
}

// ═══════════════════════════════════════════════════════════════════════
// Click mode
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn click_rearms_hide_after_click() {
    let t0 = Instant::now();
    let mut c = controller(
        TooltipOptions::new()
            .trigger(Trigger::Click)
            .hide_delay_after_click(2000u64),
    );
    c.handle(TriggerEvent::Click, t0);
    assert_eq!(c.state(), VisibilityState::Visible);

    c.handle(TriggerEvent::Click, t0 + ms(500));
    c.advance(t0 + ms(2499));
    assert_eq!(c.state(), VisibilityState::Visible);

    c.advance(t0 + ms(2500));
    assert_eq!(c.state(), VisibilityState::AwaitingHide);

    // Hide delay (300ms) follows the click timeout.
    c.advance(t0 + ms(2800));
    assert_eq!(c.state(), VisibilityState::Hidden);
    assert_eq!(
        kinds(&mut c),
        vec![LifecycleKind::Show, LifecycleKind::Shown, LifecycleKind::Hide]
    );
}

#[test]
fn click_during_hide_delay_returns_to_visible() {
    let t0 = Instant::now();
    let mut c = controller(
        TooltipOptions::new()
            .trigger(Trigger::Click)
            .hide_delay_after_click(1000u64),
    );
    c.handle(TriggerEvent::Click, t0);
    c.advance(t0 + ms(1000));
    assert_eq!(c.state(), VisibilityState::AwaitingHide);

    c.handle(TriggerEvent::Click, t0 + ms(1100));
    assert_eq!(c.state(), VisibilityState::Visible);
    c.advance(t0 + ms(2099));
    assert_eq!(c.state(), VisibilityState::Visible);
    c.advance(t0 + ms(2100));
    assert_eq!(c.state(), VisibilityState::AwaitingHide);
}

#[test]
fn click_mode_without_timeout_stays_visible() {
    let t0 = Instant::now();
    let mut c = controller(TooltipOptions::new().trigger(Trigger::Click));
    c.handle(TriggerEvent::Click, t0);
    c.advance(t0 + ms(60_000));
    assert_eq!(c.state(), VisibilityState::Visible);
    assert_eq!(c.overlay().unwrap().phase(), OverlayPhase::Shown);
}

// ═══════════════════════════════════════════════════════════════════════
// Teardown
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn destroy_during_show_delay_emits_nothing() {
    let t0 = Instant::now();
    let mut c = controller(TooltipOptions::new().show_delay(100u64));
    c.show(t0);
    c.destroy(t0 + ms(50));
    c.advance(t0 + ms(1000));
    assert!(kinds(&mut c).is_empty());
    assert_eq!(c.state(), VisibilityState::Destroyed);
}

#[test]
fn destroy_on_hide_allocates_fresh_overlay() {
    let t0 = Instant::now();
    let mut c = VisibilityController::with_config(
        Page::default(),
        OptionLayers::new(),
        ControllerConfig::default().destroy_on_hide(true),
    );
    c.show(t0);
    c.hide(t0 + ms(100));
    c.advance(t0 + ms(1000));
    assert!(c.overlay().is_none());

    c.show(t0 + ms(1100));
    assert_eq!(c.overlay().unwrap().phase(), OverlayPhase::FadingIn);
}

// ═══════════════════════════════════════════════════════════════════════
// Arbitrary trigger sequences
// ═══════════════════════════════════════════════════════════════════════

fn trigger_strategy() -> impl Strategy<Value = TriggerEvent> {
    prop::sample::select(vec![
        TriggerEvent::PointerEnter,
        TriggerEvent::PointerLeave,
        TriggerEvent::FocusIn,
        TriggerEvent::FocusOut,
        TriggerEvent::Click,
        TriggerEvent::OverlayClick,
        TriggerEvent::Scroll,
        TriggerEvent::Resize,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// `show` pairs with `shown` or `hide`, and `hide` always pairs with
    /// `hidden` once everything settles and the instance is destroyed.
    #[test]
    fn lifecycle_events_stay_paired(
        steps in prop::collection::vec((trigger_strategy(), 0u64..400), 1..40),
        click_mode in any::<bool>(),
    ) {
        let trigger = if click_mode { Trigger::Click } else { Trigger::Hover };
        let mut c = controller(
            TooltipOptions::new()
                .trigger(trigger)
                .show_delay(50u64)
                .hide_delay_after_click(700u64),
        );
        let t0 = Instant::now();
        let mut at = t0;
        for (event, gap) in steps {
            at += ms(gap);
            c.handle(event, at);
        }
        c.destroy(at + ms(1));

        let mut showing = false;
        let mut hiding = false;
        for kind in kinds(&mut c) {
            match kind {
                LifecycleKind::Show => {
                    prop_assert!(!showing && !hiding);
                    showing = true;
                }
                LifecycleKind::Shown => {
                    prop_assert!(showing);
                    showing = false;
                }
                LifecycleKind::Hide => {
                    prop_assert!(!hiding);
                    showing = false;
                    hiding = true;
                }
                LifecycleKind::Hidden => {
                    prop_assert!(hiding);
                    hiding = false;
                }
            }
        }
        prop_assert!(!showing && !hiding);
        prop_assert_eq!(c.state(), VisibilityState::Destroyed);
        prop_assert_eq!(c.next_deadline(), None);
    }
}
