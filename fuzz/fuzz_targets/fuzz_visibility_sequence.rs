#![no_main]

use anchortip_core::{
    AnchorProvider, ContentProvider, ContentType, DeviceProvider, DeviceTraits, OptionLayers,
    OverlayMeasure, Rect, Size, TooltipOptions, Trigger, TriggerEvent, ViewportMetrics,
};
use anchortip_runtime::{LifecycleKind, VisibilityController, VisibilityState};
use std::sync::{Arc, Mutex};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use web_time::{Duration, Instant};

#[derive(Debug, Arbitrary)]
enum Op {
    Event(u8),
    Show,
    Hide,
    Reposition,
    Wait(u16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    click_mode: bool,
    touch: bool,
    show_delay: u16,
    hide_delay: u16,
    hide_after_click: u16,
    animation: u16,
    ops: Vec<Op>,
}

struct Page {
    device: DeviceTraits,
}

impl AnchorProvider for Page {
    fn anchor_rect(&self) -> Option<Rect> {
        Some(Rect::new(100.0, 50.0, 20.0, 10.0))
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
        0.0
    }
}

impl ContentProvider for Page {
    fn has_content(&self, _: ContentType) -> bool {
        true
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

const EVENTS: [TriggerEvent; 8] = [
    TriggerEvent::PointerEnter,
    TriggerEvent::PointerLeave,
    TriggerEvent::FocusIn,
    TriggerEvent::FocusOut,
    TriggerEvent::Click,
    TriggerEvent::OverlayClick,
    TriggerEvent::Scroll,
    TriggerEvent::Resize,
];

fuzz_target!(|input: Input| {
    let options = TooltipOptions::new()
        .trigger(if input.click_mode { Trigger::Click } else { Trigger::Hover })
        .show_delay(u64::from(input.show_delay))
        .hide_delay(u64::from(input.hide_delay))
        .hide_delay_after_click(u64::from(input.hide_after_click))
        .animation_duration(u64::from(input.animation));
    let device = if input.touch {
        DeviceTraits::TOUCHSCREEN
    } else {
        DeviceTraits::empty()
    };
    let mut c = VisibilityController::new(Page { device }, OptionLayers::new().instance(options));
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        c.subscribe(move |e| seen.lock().unwrap().push(e.kind));
    }

    let mut now = Instant::now();
    for op in input.ops {
        match op {
            Op::Event(i) => c.handle(EVENTS[usize::from(i) % EVENTS.len()], now),
            Op::Show => c.show(now),
            Op::Hide => c.hide(now),
            Op::Reposition => {
                c.reposition();
            }
            Op::Wait(ms) => {
                now += Duration::from_millis(u64::from(ms));
                c.advance(now);
            }
        }
        if let Some(deadline) = c.next_deadline() {
            assert!(deadline > now, "due work left unprocessed");
        }
    }
    c.destroy(now);

    // Every `hide` is matched by a `hidden`.
    let events = seen.lock().unwrap();
    let hides = events.iter().filter(|k| **k == LifecycleKind::Hide).count();
    let hiddens = events.iter().filter(|k| **k == LifecycleKind::Hidden).count();
    assert_eq!(hides, hiddens);
    assert_eq!(c.state(), VisibilityState::Destroyed);
    assert_eq!(c.next_deadline(), None);
});
