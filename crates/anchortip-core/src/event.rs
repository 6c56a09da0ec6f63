#![forbid(unsafe_code)]

//! Trigger events fed to the visibility controller.
//!
//! These are the element-scoped and viewport-scoped signals a host forwards.
//! They carry no payload: geometry is always re-read from the host when a
//! transition needs it, so a stale coordinate can never be replayed.

/// A signal from the trigger element or the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEvent {
    /// Pointer entered the trigger element.
    PointerEnter,
    /// Pointer left the trigger element.
    PointerLeave,
    /// The trigger element (or a descendant) gained focus.
    FocusIn,
    /// The trigger element (or a descendant) lost focus.
    FocusOut,
    /// The trigger element was clicked.
    Click,
    /// The overlay itself was clicked.
    OverlayClick,
    /// The document scrolled.
    Scroll,
    /// The window was resized.
    Resize,
}

impl TriggerEvent {
    /// Pointer-enter and focus-in.
    pub const fn is_show_trigger(self) -> bool {
        matches!(self, Self::PointerEnter | Self::FocusIn)
    }

    /// Pointer-leave and focus-out.
    pub const fn is_hide_trigger(self) -> bool {
        matches!(self, Self::PointerLeave | Self::FocusOut)
    }

    /// Scroll and resize, which only affect placement.
    pub const fn is_viewport_change(self) -> bool {
        matches!(self, Self::Scroll | Self::Resize)
    }
}
