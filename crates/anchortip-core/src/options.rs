#![forbid(unsafe_code)]

//! Layered tooltip options.
//!
//! A tooltip's effective [`Configuration`] is merged from four layers, lowest
//! precedence first:
//!
//! 1. built-in defaults ([`Configuration::default`]),
//! 2. globally configured defaults,
//! 3. the per-instance options object,
//! 4. individually specified per-field overrides.
//!
//! Each layer is a [`TooltipOptions`] in which every field is optional. The
//! merge is shallow: a field present in a higher layer replaces the same field
//! from a lower one, absent fields fall through, and compound values (the
//! explicit `position`) are taken wholesale.
//!
//! # Loading
//!
//! With the `config-files` feature, a layer can be read from TOML or JSON using
//! the same camelCase keys as the option surface:
//!
//! ```toml
//! placement = "bottom-left"
//! trigger = "click"
//! hideDelayAfterClick = 2000
//! ```
//!
//! ```rust,ignore
//! let global = TooltipOptions::from_toml_file("tooltip.toml")?;
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "config-files")]
use std::path::Path;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::host::DeviceTraits;
use crate::placement::Placement;

// ---------------------------------------------------------------------------
// Enumerated option values
// ---------------------------------------------------------------------------

/// Declares a fieldless enum whose variants map to fixed option strings.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// The option string for this value.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(ParseOptionError::new($kind, other)),
                }
            }
        }

        #[cfg(feature = "config-files")]
        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        #[cfg(feature = "config-files")]
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// Interaction mode that drives show/hide.
    Trigger, "trigger" {
        /// Pointer-enter/focus-in show, pointer-leave/focus-out hide.
        Hover => "hover",
        /// Clicking the trigger element shows.
        Click => "click",
    }
}

string_enum! {
    /// Which content payload is active.
    ContentType, "contentType" {
        String => "string",
        Html => "html",
        Template => "template",
    }
}

string_enum! {
    /// Visual theme token, passed through to the renderer.
    Theme, "theme" {
        Dark => "dark",
        Light => "light",
        WhiteBlue => "white-blue",
    }
}

string_enum! {
    /// Whether the overlay reacts to pointer input.
    PointerEvents, "pointerEvents" {
        Auto => "auto",
        /// Clicks pass through the overlay.
        None => "none",
    }
}

/// An option string that names no known value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl ParseOptionError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }

    /// The option the value was given for.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The rejected value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseOptionError {}

// ---------------------------------------------------------------------------
// Partial option layer
// ---------------------------------------------------------------------------

/// One layer of tooltip options. Absent fields fall through to lower layers.
///
/// Delays and durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "config-files",
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct TooltipOptions {
    pub id: Option<String>,
    pub placement: Option<Placement>,
    pub auto_placement: Option<bool>,
    pub content_type: Option<ContentType>,
    pub show_delay: Option<u64>,
    pub hide_delay: Option<u64>,
    pub hide_delay_touchscreen: Option<u64>,
    /// `0` disables hiding after a click.
    pub hide_delay_after_click: Option<u64>,
    pub z_index: Option<i32>,
    pub animation_duration: Option<u64>,
    pub animation_duration_default: Option<u64>,
    pub trigger: Option<Trigger>,
    /// Space-separated custom class tokens.
    pub tooltip_class: Option<String>,
    pub display: Option<bool>,
    pub display_mobile: Option<bool>,
    pub display_touchscreen: Option<bool>,
    pub shadow: Option<bool>,
    pub theme: Option<Theme>,
    pub offset: Option<f64>,
    pub width: Option<String>,
    pub max_width: Option<String>,
    pub pointer_events: Option<PointerEvents>,
    /// Explicit anchor point overriding the element geometry.
    pub position: Option<Point>,
}

macro_rules! option_setters {
    ($( $(#[$meta:meta])* $field:ident: $ty:ty ),+ $(,)?) => {
        impl TooltipOptions {
            $(
                $(#[$meta])*
                #[must_use]
                pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )+
        }
    };
}

option_setters! {
    /// Set the instance id.
    id: String,
    /// Set the requested placement.
    placement: Placement,
    /// Enable or disable the fallback search.
    auto_placement: bool,
    /// Set the active content type.
    content_type: ContentType,
    /// Set the show delay in milliseconds.
    show_delay: u64,
    /// Set the hide delay in milliseconds.
    hide_delay: u64,
    /// Set the touchscreen hide delay in milliseconds.
    hide_delay_touchscreen: u64,
    /// Set the hide-after-click delay in milliseconds (`0` disables).
    hide_delay_after_click: u64,
    /// Set the z-index.
    z_index: i32,
    /// Set the animation duration in milliseconds.
    animation_duration: u64,
    /// Set the fallback animation duration in milliseconds.
    animation_duration_default: u64,
    /// Set the trigger mode.
    trigger: Trigger,
    /// Set custom class tokens.
    tooltip_class: String,
    /// Enable or disable display entirely.
    display: bool,
    /// Enable or disable display on mobile devices.
    display_mobile: bool,
    /// Enable or disable display on touchscreens.
    display_touchscreen: bool,
    /// Enable or disable the shadow.
    shadow: bool,
    /// Set the theme.
    theme: Theme,
    /// Set the anchor gap.
    offset: f64,
    /// Set the width hint.
    width: String,
    /// Set the max-width hint.
    max_width: String,
    /// Set the pointer-events mode.
    pointer_events: PointerEvents,
    /// Set an explicit anchor point.
    position: Point,
}

impl TooltipOptions {
    /// Create an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge: fields set in `higher` win over fields set in `self`.
    #[must_use]
    pub fn merged_with(&self, higher: &TooltipOptions) -> TooltipOptions {
        TooltipOptions {
            id: higher.id.clone().or_else(|| self.id.clone()),
            placement: higher.placement.or(self.placement),
            auto_placement: higher.auto_placement.or(self.auto_placement),
            content_type: higher.content_type.or(self.content_type),
            show_delay: higher.show_delay.or(self.show_delay),
            hide_delay: higher.hide_delay.or(self.hide_delay),
            hide_delay_touchscreen: higher.hide_delay_touchscreen.or(self.hide_delay_touchscreen),
            hide_delay_after_click: higher.hide_delay_after_click.or(self.hide_delay_after_click),
            z_index: higher.z_index.or(self.z_index),
            animation_duration: higher.animation_duration.or(self.animation_duration),
            animation_duration_default: higher
                .animation_duration_default
                .or(self.animation_duration_default),
            trigger: higher.trigger.or(self.trigger),
            tooltip_class: higher
                .tooltip_class
                .clone()
                .or_else(|| self.tooltip_class.clone()),
            display: higher.display.or(self.display),
            display_mobile: higher.display_mobile.or(self.display_mobile),
            display_touchscreen: higher.display_touchscreen.or(self.display_touchscreen),
            shadow: higher.shadow.or(self.shadow),
            theme: higher.theme.or(self.theme),
            offset: higher.offset.or(self.offset),
            width: higher.width.clone().or_else(|| self.width.clone()),
            max_width: higher.max_width.clone().or_else(|| self.max_width.clone()),
            pointer_events: higher.pointer_events.or(self.pointer_events),
            position: higher.position.or(self.position),
        }
    }

    /// Load a layer from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, OptionsError> {
        toml::from_str(s).map_err(OptionsError::Toml)
    }

    /// Load a layer from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(OptionsError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load a layer from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(s).map_err(OptionsError::Json)
    }

    /// Load a layer from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(OptionsError::Io)?;
        Self::from_json_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Effective configuration of one tooltip instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub id: Option<String>,
    /// Requested placement. Default: `top`.
    pub placement: Placement,
    /// Search fallback placements when clipped. Default: `true`.
    pub auto_placement: bool,
    /// Default: `string`.
    pub content_type: ContentType,
    /// Default: 0ms.
    pub show_delay: Duration,
    /// Default: 300ms.
    pub hide_delay: Duration,
    /// Used instead of `hide_delay` on touchscreens when non-zero. Default: 0ms.
    pub hide_delay_touchscreen: Duration,
    /// Hide this long after a click in click mode. Default: disabled.
    pub hide_delay_after_click: Option<Duration>,
    /// Default: 0.
    pub z_index: i32,
    /// Default: 300ms.
    pub animation_duration: Duration,
    /// Used when `animation_duration` is zero. Default: 300ms.
    pub animation_duration_default: Duration,
    /// Default: `hover`.
    pub trigger: Trigger,
    /// Default: empty.
    pub tooltip_class: String,
    /// Default: `true`.
    pub display: bool,
    /// Default: `true`.
    pub display_mobile: bool,
    /// Default: `true`.
    pub display_touchscreen: bool,
    /// Default: `true`.
    pub shadow: bool,
    /// Default: `white-blue`.
    pub theme: Theme,
    /// Gap between anchor and overlay in pixels. Default: 8.
    pub offset: f64,
    /// Default: unset.
    pub width: Option<String>,
    /// Default: `200px`.
    pub max_width: Option<String>,
    /// Default: `auto`.
    pub pointer_events: PointerEvents,
    /// Explicit anchor point. Default: unset.
    pub position: Option<Point>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            id: None,
            placement: Placement::Top,
            auto_placement: true,
            content_type: ContentType::String,
            show_delay: Duration::ZERO,
            hide_delay: Duration::from_millis(300),
            hide_delay_touchscreen: Duration::ZERO,
            hide_delay_after_click: None,
            z_index: 0,
            animation_duration: Duration::from_millis(300),
            animation_duration_default: Duration::from_millis(300),
            trigger: Trigger::Hover,
            tooltip_class: String::new(),
            display: true,
            display_mobile: true,
            display_touchscreen: true,
            shadow: true,
            theme: Theme::WhiteBlue,
            offset: 8.0,
            width: None,
            max_width: Some("200px".to_owned()),
            pointer_events: PointerEvents::Auto,
            position: None,
        }
    }
}

impl Configuration {
    /// Overwrite every field that `layer` sets.
    pub fn apply(&mut self, layer: &TooltipOptions) {
        if let Some(id) = &layer.id {
            self.id = Some(id.clone());
        }
        if let Some(placement) = layer.placement {
            self.placement = placement;
        }
        if let Some(auto) = layer.auto_placement {
            self.auto_placement = auto;
        }
        if let Some(content_type) = layer.content_type {
            self.content_type = content_type;
        }
        if let Some(ms) = layer.show_delay {
            self.show_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = layer.hide_delay {
            self.hide_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = layer.hide_delay_touchscreen {
            self.hide_delay_touchscreen = Duration::from_millis(ms);
        }
        if let Some(ms) = layer.hide_delay_after_click {
            self.hide_delay_after_click = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(z) = layer.z_index {
            self.z_index = z;
        }
        if let Some(ms) = layer.animation_duration {
            self.animation_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = layer.animation_duration_default {
            self.animation_duration_default = Duration::from_millis(ms);
        }
        if let Some(trigger) = layer.trigger {
            self.trigger = trigger;
        }
        if let Some(class) = &layer.tooltip_class {
            self.tooltip_class = class.clone();
        }
        if let Some(display) = layer.display {
            self.display = display;
        }
        if let Some(display) = layer.display_mobile {
            self.display_mobile = display;
        }
        if let Some(display) = layer.display_touchscreen {
            self.display_touchscreen = display;
        }
        if let Some(shadow) = layer.shadow {
            self.shadow = shadow;
        }
        if let Some(theme) = layer.theme {
            self.theme = theme;
        }
        if let Some(offset) = layer.offset {
            self.offset = offset;
        }
        if let Some(width) = &layer.width {
            self.width = non_empty(width);
        }
        if let Some(max_width) = &layer.max_width {
            self.max_width = non_empty(max_width);
        }
        if let Some(pointer_events) = layer.pointer_events {
            self.pointer_events = pointer_events;
        }
        if let Some(position) = layer.position {
            self.position = Some(position);
        }
    }

    /// Whether the display gates allow showing on `device`.
    pub fn display_allowed(&self, device: DeviceTraits) -> bool {
        if !self.display {
            return false;
        }
        if !self.display_touchscreen && device.contains(DeviceTraits::TOUCHSCREEN) {
            return false;
        }
        if !self.display_mobile && device.contains(DeviceTraits::MOBILE) {
            return false;
        }
        true
    }

    /// Hide delay for `device`: the touchscreen delay when on a touchscreen
    /// and that delay is non-zero, otherwise `hide_delay`.
    pub fn calculated_hide_delay(&self, device: DeviceTraits) -> Duration {
        if device.contains(DeviceTraits::TOUCHSCREEN) && !self.hide_delay_touchscreen.is_zero() {
            self.hide_delay_touchscreen
        } else {
            self.hide_delay
        }
    }

    /// `animation_duration`, or `animation_duration_default` when it is zero.
    pub fn effective_animation_duration(&self) -> Duration {
        if self.animation_duration.is_zero() {
            self.animation_duration_default
        } else {
            self.animation_duration
        }
    }

    /// Custom class tokens, split on whitespace.
    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.tooltip_class.split_whitespace()
    }

    /// Check parameter ranges.
    ///
    /// Returns a list of validation errors. An empty list means the
    /// configuration is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.offset.is_finite() {
            errors.push(format!("offset must be finite, got {}", self.offset));
        }

        if let Some(position) = self.position
            && !position.is_finite()
        {
            errors.push(format!(
                "position must have finite coordinates, got ({}, {})",
                position.top, position.left
            ));
        }

        if self.id.as_deref() == Some("") {
            errors.push("id must not be empty when set".into());
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) reports nothing.
    pub fn validated(self) -> Result<Self, OptionsError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(OptionsError::Validation(errors))
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Merge the four layers into one configuration.
///
/// Precedence, lowest to highest: `defaults` < `global` < `instance` <
/// `overrides`.
pub fn resolve(
    defaults: &Configuration,
    global: Option<&TooltipOptions>,
    instance: &TooltipOptions,
    overrides: &TooltipOptions,
) -> Configuration {
    let mut config = defaults.clone();
    if let Some(global) = global {
        config.apply(global);
    }
    config.apply(instance);
    config.apply(overrides);
    config
}

/// The caller-supplied layers above the built-in defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionLayers {
    /// Globally configured defaults shared by every instance.
    pub global: Option<TooltipOptions>,
    /// The options object passed to this instance.
    pub instance: TooltipOptions,
    /// Individually specified fields for this instance.
    pub overrides: TooltipOptions,
}

impl OptionLayers {
    /// Create empty layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global layer.
    #[must_use]
    pub fn global(mut self, options: TooltipOptions) -> Self {
        self.global = Some(options);
        self
    }

    /// Set the instance options object.
    #[must_use]
    pub fn instance(mut self, options: TooltipOptions) -> Self {
        self.instance = options;
        self
    }

    /// Set the per-field overrides.
    #[must_use]
    pub fn overrides(mut self, options: TooltipOptions) -> Self {
        self.overrides = options;
        self
    }

    /// Resolve against the built-in defaults.
    pub fn resolve(&self) -> Configuration {
        self.resolve_with(&Configuration::default())
    }

    /// Resolve against caller-provided defaults.
    pub fn resolve_with(&self, defaults: &Configuration) -> Configuration {
        resolve(
            defaults,
            self.global.as_ref(),
            &self.instance,
            &self.overrides,
        )
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or validating options.
#[derive(Debug)]
pub enum OptionsError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for OptionsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
