#![forbid(unsafe_code)]

//! Visibility state machine for one tooltip instance.
//!
//! [`VisibilityController`] turns trigger events and explicit `show`/`hide`
//! calls into delayed, mutually cancelling transitions, owns the overlay
//! record the host renders from, and emits lifecycle events.
//!
//! # State Machine
//!
//! ```text
//!            show trigger                 show delay
//!   Hidden ───────────────▶ AwaitingShow ───────────▶ Visible
//!     ▲                         │ hide trigger          │  ▲
//!     │◀────────────────────────┘                       │  │ show trigger
//!     │                                    hide trigger │  │
//!     │          hide delay                             ▼  │
//!     ├◀──────────────────────────────────────────── AwaitingHide
//!     │                                                 │ hide delay
//!     │   settle                                        ▼ (destroy_on_hide)
//!     └◀───────────────────────────────────────── AwaitingDestroy
//!
//!   any ── destroy() ──▶ Destroyed
//! ```
//!
//! Time is injected: every entry point takes `now`, and
//! [`advance`](VisibilityController::advance) fires whatever became due.
//! Follow-up timers are scheduled from the deadline of the timer that caused
//! them, so a run driven by virtual time is exact.
//!
//! # Invariants
//!
//! 1. At most one pending timer per kind; show and hide cancel each other.
//! 2. `show` is always followed by either `shown` or `hide`; `hide` is always
//!    followed by `hidden`, including across `destroy()`.
//! 3. `Destroyed` is terminal and every entry point is a no-op there.
//! 4. Closed display gates or missing content keep the instance out of
//!    `Visible`.
//!
//! # Example
//!
//! ```
//! use anchortip_core::{
//!     AnchorProvider, ContentProvider, ContentType, DeviceProvider, OptionLayers,
//!     OverlayMeasure, Rect, Size, TriggerEvent, ViewportMetrics,
//! };
//! use anchortip_runtime::{LifecycleKind, VisibilityController, VisibilityState};
//! use web_time::{Duration, Instant};
//!
//! struct Page;
//! impl AnchorProvider for Page {
//!     fn anchor_rect(&self) -> Option<Rect> { Some(Rect::new(100.0, 50.0, 20.0, 10.0)) }
//! }
//! impl ViewportMetrics for Page {
//!     fn inner_height(&self) -> f64 { 600.0 }
//!     fn content_width(&self) -> f64 { 800.0 }
//!     fn scroll_y(&self) -> f64 { 0.0 }
//! }
//! impl ContentProvider for Page {
//!     fn has_content(&self, _: ContentType) -> bool { true }
//! }
//! impl OverlayMeasure for Page {
//!     fn overlay_size(&self) -> Size { Size::new(40.0, 10.0) }
//! }
//! impl DeviceProvider for Page {}
//!
//! let t0 = Instant::now();
//! let mut tooltip = VisibilityController::new(Page, OptionLayers::new());
//! tooltip.handle(TriggerEvent::PointerEnter, t0);
//! assert_eq!(tooltip.state(), VisibilityState::Visible);
//!
//! tooltip.advance(t0 + Duration::from_millis(300));
//! let kinds: Vec<_> = tooltip.drain_events().into_iter().map(|e| e.kind).collect();
//! assert_eq!(kinds, [LifecycleKind::Show, LifecycleKind::Shown]);
//! ```

use std::fmt;

use anchortip_core::{
    Anchor, Configuration, DeviceTraits, OptionLayers, Placement, PlacementRequest, Point,
    PointerEvents, PositionResult, Resolution, TooltipHost, Trigger, TriggerEvent,
    resolve_placement,
};
use web_time::{Duration, Instant};

use crate::lifecycle::{LifecycleEmitter, LifecycleEvent, LifecycleKind, ListenerId};
use crate::reposition::{DEFAULT_REPOSITION_INTERVAL, RepositionThrottle};
use crate::timer::TimerArbiter;

// ---------------------------------------------------------------------------
// Public state types
// ---------------------------------------------------------------------------

/// Visibility state of a tooltip instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    /// Show delay running.
    AwaitingShow,
    Visible,
    /// Hide delay running; the overlay is still visible.
    AwaitingHide,
    /// Hidden, waiting for the exit animation before the overlay is released.
    AwaitingDestroy,
    /// Terminal.
    Destroyed,
}

impl VisibilityState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::AwaitingShow => "awaiting-show",
            Self::Visible => "visible",
            Self::AwaitingHide => "awaiting-hide",
            Self::AwaitingDestroy => "awaiting-destroy",
            Self::Destroyed => "destroyed",
        }
    }

    /// Whether the overlay is on screen and not yet hiding.
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible | Self::AwaitingHide)
    }
}

impl fmt::Display for VisibilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation phase of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPhase {
    FadingIn,
    Shown,
    FadingOut,
    /// Retained for reuse but not displayed.
    Concealed,
}

/// The overlay record a host renders from.
///
/// Allocated on first show and reused afterwards unless the controller is
/// configured with `destroy_on_hide`.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    phase: OverlayPhase,
    result: PositionResult,
    configuration: Configuration,
}

impl Overlay {
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Last placement result.
    pub fn result(&self) -> PositionResult {
        self.result
    }

    /// Overlay top-left in document coordinates.
    pub fn position(&self) -> Point {
        self.result.position
    }

    pub fn placement(&self) -> Placement {
        self.result.placement
    }

    /// Configuration in effect when the overlay was last shown. Styling hints
    /// (theme, classes, z-index, sizing) are read from here.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Whether the overlay should be displayed.
    pub fn is_displayed(&self) -> bool {
        self.phase != OverlayPhase::Concealed
    }
}

/// Controller behavior that is not part of the tooltip options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Audit window for scroll/resize re-placement (default: 100ms).
    pub reposition_interval: Duration,
    /// Release the overlay after each hide instead of retaining it
    /// (default: false).
    pub destroy_on_hide: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reposition_interval: DEFAULT_REPOSITION_INTERVAL,
            destroy_on_hide: false,
        }
    }
}

impl ControllerConfig {
    #[must_use]
    pub fn reposition_interval(mut self, interval: Duration) -> Self {
        self.reposition_interval = interval;
        self
    }

    #[must_use]
    pub fn destroy_on_hide(mut self, enabled: bool) -> Self {
        self.destroy_on_hide = enabled;
        self
    }
}

// ---------------------------------------------------------------------------
// Internal timer plumbing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Show,
    Hide,
    HideAfterClick,
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Show delay elapsed.
    Reveal,
    /// Hide-after-click elapsed.
    ClickExpired,
    /// Hide delay elapsed.
    Conceal,
    /// Enter animation settled.
    FinishShow,
    /// Exit animation settled.
    FinishHide,
}

// ---------------------------------------------------------------------------
// VisibilityController
// ---------------------------------------------------------------------------

/// One tooltip instance: configuration, visibility state, overlay, timers.
pub struct VisibilityController<H> {
    host: H,
    layers: OptionLayers,
    configuration: Configuration,
    settings: ControllerConfig,
    state: VisibilityState,
    overlay: Option<Overlay>,
    timers: TimerArbiter<TimerKind, Step>,
    throttle: RepositionThrottle,
    emitter: LifecycleEmitter,
}

impl<H> fmt::Debug for VisibilityController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityController")
            .field("state", &self.state)
            .field("overlay", &self.overlay.as_ref().map(|o| o.phase))
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

impl<H: TooltipHost> VisibilityController<H> {
    /// Create an instance with default controller settings.
    pub fn new(host: H, layers: OptionLayers) -> Self {
        Self::with_config(host, layers, ControllerConfig::default())
    }

    /// Create an instance with explicit controller settings.
    pub fn with_config(host: H, layers: OptionLayers, settings: ControllerConfig) -> Self {
        let configuration = resolve_layers(&layers);
        Self {
            host,
            layers,
            configuration,
            throttle: RepositionThrottle::new(settings.reposition_interval),
            settings,
            state: VisibilityState::Hidden,
            overlay: None,
            timers: TimerArbiter::new(),
            emitter: LifecycleEmitter::new(),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn layers(&self) -> &OptionLayers {
        &self.layers
    }

    pub fn settings(&self) -> &ControllerConfig {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for hosts whose geometry changes between calls.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Earliest instant at which [`advance`](Self::advance) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.timers.next_deadline(), self.throttle.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Lifecycle listeners ─────────────────────────────────────────────

    /// Register a lifecycle listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&LifecycleEvent) + Send + 'static,
    ) -> ListenerId {
        self.emitter.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.emitter.unsubscribe(id)
    }

    /// Take every queued lifecycle event, oldest first.
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        self.emitter.drain()
    }

    // ── Entry points ────────────────────────────────────────────────────

    /// Replace the option layers and re-resolve the configuration.
    ///
    /// Takes effect for the next transition; a visible overlay keeps the
    /// configuration it was shown with until it is shown again.
    pub fn configure(&mut self, layers: OptionLayers) {
        self.configuration = resolve_layers(&layers);
        self.layers = layers;
        tracing::debug!(
            trigger = self.configuration.trigger.as_str(),
            placement = self.configuration.placement.as_str(),
            "configuration updated"
        );
    }

    /// Feed one trigger event.
    pub fn handle(&mut self, event: TriggerEvent, now: Instant) {
        self.advance(now);
        if self.state == VisibilityState::Destroyed {
            tracing::trace!(?event, "event ignored after destroy");
            return;
        }

        let trigger = self.configuration.trigger;
        match event {
            e if e.is_show_trigger() && trigger == Trigger::Hover => {
                self.request_show(now, "show trigger");
            }
            e if e.is_hide_trigger() && trigger == Trigger::Hover => {
                self.request_hide(now, "hide trigger");
            }
            TriggerEvent::Click if trigger == Trigger::Click => {
                if self.state == VisibilityState::Visible {
                    self.arm_hide_after_click(now);
                } else {
                    self.request_show(now, "click");
                }
            }
            TriggerEvent::OverlayClick
                if trigger == Trigger::Click
                    && self.configuration.pointer_events != PointerEvents::None
                    && self.state.is_visible() =>
            {
                self.conceal(now, "overlay click");
            }
            e if e.is_viewport_change() && self.state.is_visible() => {
                self.throttle.signal(now);
            }
            _ => {
                tracing::trace!(?event, trigger = trigger.as_str(), "event not applicable");
            }
        }

        self.advance(now);
    }

    /// Show, subject to the show delay.
    ///
    /// No-op when visible, destroyed, when the display gates are closed, or
    /// when there is no content.
    pub fn show(&mut self, now: Instant) {
        self.advance(now);
        if self.state != VisibilityState::Destroyed {
            self.request_show(now, "show()");
        }
        self.advance(now);
    }

    /// Hide, subject to the hide delay. Cancels a pending show.
    pub fn hide(&mut self, now: Instant) {
        self.advance(now);
        if self.state != VisibilityState::Destroyed {
            self.request_hide(now, "hide()");
        }
        self.advance(now);
    }

    /// Tear the instance down.
    ///
    /// A visible overlay emits `hide` then `hidden` at once; an exit
    /// animation in flight emits only its pending `hidden`. Idempotent.
    pub fn destroy(&mut self, now: Instant) {
        self.advance(now);
        if self.state == VisibilityState::Destroyed {
            return;
        }

        if self.state.is_visible() {
            self.emit(LifecycleKind::Hide);
            self.emit(LifecycleKind::Hidden);
        } else if self.timers.pending_action(TimerKind::Settle) == Some(&Step::FinishHide) {
            self.emit(LifecycleKind::Hidden);
        }

        self.timers.cancel_all();
        self.throttle.cancel();
        self.overlay = None;
        self.set_state(VisibilityState::Destroyed, "destroy()");
    }

    /// Fire every timer and reposition window due at or before `now`, in
    /// deadline order.
    pub fn advance(&mut self, now: Instant) {
        loop {
            let timer_due = self.timers.next_deadline().filter(|d| *d <= now);
            let throttle_due = self.throttle.deadline().filter(|d| *d <= now);
            match (timer_due, throttle_due) {
                (Some(t), Some(r)) if r < t => self.run_reposition(now),
                (Some(_), _) => {
                    let Some(fired) = self.timers.pop_due(now) else {
                        break;
                    };
                    self.run_step(fired.action, fired.deadline);
                }
                (None, Some(_)) => self.run_reposition(now),
                (None, None) => break,
            }
        }
    }

    /// Re-resolve placement for the visible overlay right away.
    ///
    /// Returns the new result, or `None` when nothing is visible.
    pub fn reposition(&mut self) -> Option<PositionResult> {
        if !self.state.is_visible() {
            return None;
        }
        let previous = self.overlay.as_ref().map(|o| o.result.placement);
        let result = self.place(previous);
        let overlay = self.overlay.as_mut()?;
        if overlay.result.placement != result.placement {
            tracing::debug!(
                from = overlay.result.placement.as_str(),
                to = result.placement.as_str(),
                "placement changed on reposition"
            );
        }
        overlay.result = result;
        Some(result)
    }

    // ── Transitions ─────────────────────────────────────────────────────

    fn request_show(&mut self, now: Instant, reason: &'static str) {
        let device = self.device();
        if !self.configuration.display_allowed(device) {
            tracing::trace!(?device, reason, "show suppressed by display gates");
            return;
        }

        match self.state {
            VisibilityState::Visible | VisibilityState::Destroyed => {}
            VisibilityState::AwaitingHide => {
                self.timers.cancel_kind(TimerKind::Hide);
                self.set_state(VisibilityState::Visible, reason);
                if self.configuration.trigger == Trigger::Click {
                    self.arm_hide_after_click(now);
                }
            }
            VisibilityState::Hidden
            | VisibilityState::AwaitingShow
            | VisibilityState::AwaitingDestroy => {
                if !self.host.has_content(self.configuration.content_type) {
                    tracing::trace!(reason, "show suppressed, no content");
                    return;
                }
                self.timers.cancel_kind(TimerKind::Hide);
                self.timers
                    .schedule(TimerKind::Show, now, self.configuration.show_delay, Step::Reveal);
                self.set_state(VisibilityState::AwaitingShow, reason);
            }
        }
    }

    fn request_hide(&mut self, now: Instant, reason: &'static str) {
        match self.state {
            VisibilityState::AwaitingShow => {
                self.timers.cancel_kind(TimerKind::Show);
                self.set_state(VisibilityState::Hidden, reason);
            }
            VisibilityState::Visible => {
                self.timers.cancel_kind(TimerKind::HideAfterClick);
                let delay = self.configuration.calculated_hide_delay(self.device());
                self.timers
                    .schedule(TimerKind::Hide, now, delay, Step::Conceal);
                self.set_state(VisibilityState::AwaitingHide, reason);
            }
            _ => {}
        }
    }

    fn arm_hide_after_click(&mut self, now: Instant) {
        if let Some(delay) = self.configuration.hide_delay_after_click {
            self.timers
                .schedule(TimerKind::HideAfterClick, now, delay, Step::ClickExpired);
        }
    }

    fn run_step(&mut self, step: Step, at: Instant) {
        match step {
            Step::Reveal => self.reveal(at),
            Step::ClickExpired => {
                if self.state == VisibilityState::Visible {
                    self.request_hide(at, "hide after click");
                }
            }
            Step::Conceal => {
                if self.state == VisibilityState::AwaitingHide {
                    self.conceal(at, "hide delay elapsed");
                }
            }
            Step::FinishShow => {
                if let Some(overlay) = self.overlay.as_mut()
                    && overlay.phase == OverlayPhase::FadingIn
                {
                    overlay.phase = OverlayPhase::Shown;
                }
                self.emit(LifecycleKind::Shown);
            }
            Step::FinishHide => self.finish_hide(),
        }
    }

    fn reveal(&mut self, at: Instant) {
        if self.state != VisibilityState::AwaitingShow {
            return;
        }
        let device = self.device();
        if !self.configuration.display_allowed(device)
            || !self.host.has_content(self.configuration.content_type)
        {
            self.set_state(VisibilityState::Hidden, "content or display gone before show");
            return;
        }

        // An exit animation still in flight settles before the new show.
        if self.timers.pending_action(TimerKind::Settle) == Some(&Step::FinishHide) {
            self.timers.cancel_kind(TimerKind::Settle);
            self.finish_hide();
        }

        let previous = self.overlay.as_ref().map(|o| o.result.placement);
        let result = self.place(previous);
        if result.resolution != Resolution::Requested {
            tracing::debug!(
                requested = self.configuration.placement.as_str(),
                chosen = result.placement.as_str(),
                clipped = result.resolution == Resolution::Clipped,
                "placement fell back"
            );
        }

        match self.overlay.as_mut() {
            Some(overlay) => {
                overlay.phase = OverlayPhase::FadingIn;
                overlay.result = result;
                overlay.configuration = self.configuration.clone();
            }
            None => {
                self.overlay = Some(Overlay {
                    phase: OverlayPhase::FadingIn,
                    result,
                    configuration: self.configuration.clone(),
                });
            }
        }

        self.set_state(VisibilityState::Visible, "show delay elapsed");
        self.emit(LifecycleKind::Show);
        self.timers.schedule(
            TimerKind::Settle,
            at,
            self.configuration.effective_animation_duration(),
            Step::FinishShow,
        );
        if self.configuration.trigger == Trigger::Click {
            self.arm_hide_after_click(at);
        }
    }

    fn conceal(&mut self, at: Instant, reason: &'static str) {
        self.timers.cancel_kind(TimerKind::Hide);
        self.timers.cancel_kind(TimerKind::HideAfterClick);
        // Superseding the settle slot drops a pending `shown`.
        self.timers.schedule(
            TimerKind::Settle,
            at,
            self.configuration.effective_animation_duration(),
            Step::FinishHide,
        );
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.phase = OverlayPhase::FadingOut;
        }
        self.throttle.cancel();

        let next = if self.settings.destroy_on_hide {
            VisibilityState::AwaitingDestroy
        } else {
            VisibilityState::Hidden
        };
        self.set_state(next, reason);
        self.emit(LifecycleKind::Hide);
    }

    fn finish_hide(&mut self) {
        self.emit(LifecycleKind::Hidden);
        if self.settings.destroy_on_hide {
            self.overlay = None;
        } else if let Some(overlay) = self.overlay.as_mut() {
            overlay.phase = OverlayPhase::Concealed;
        }
        if self.state == VisibilityState::AwaitingDestroy {
            self.set_state(VisibilityState::Hidden, "overlay released");
        }
    }

    fn run_reposition(&mut self, now: Instant) {
        if self.throttle.poll(now) {
            self.reposition();
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn device(&self) -> DeviceTraits {
        self.host.device()
    }

    fn anchor(&self) -> Anchor {
        Anchor::from_parts(
            self.configuration.position,
            self.host.anchor_rect(),
            self.host.scroll_y(),
        )
    }

    fn place(&self, previous: Option<Placement>) -> PositionResult {
        let request = PlacementRequest::new(
            self.anchor(),
            self.host.overlay_size(),
            self.configuration.placement,
        )
        .offset(self.configuration.offset)
        .auto_placement(self.configuration.auto_placement)
        .previous(previous);
        resolve_placement(&request, &self.host.viewport())
    }

    fn emit(&mut self, kind: LifecycleKind) {
        let event = LifecycleEvent {
            kind,
            position: self.anchor().origin(),
            placement: self.overlay.as_ref().map(|o| o.result.placement),
        };
        self.emitter.emit(event);
    }

    fn set_state(&mut self, to: VisibilityState, reason: &'static str) {
        let from = self.state;
        if from != to {
            tracing::debug!(from = from.as_str(), to = to.as_str(), reason, "visibility transition");
            self.state = to;
        }
    }
}

fn resolve_layers(layers: &OptionLayers) -> Configuration {
    let configuration = layers.resolve();
    for problem in configuration.validate() {
        tracing::warn!(%problem, "tooltip option out of range");
    }
    configuration
}
