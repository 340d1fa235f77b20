//! Page-level style effects derived from the preference record.
//!
//! The flag and variable names below are a published contract: the visual
//! layer is allowed to select on them. Renaming one is a breaking change.

use crate::prefs::model::AccessibilityPreferences;
use std::collections::BTreeMap;

pub const FLAG_HIGH_CONTRAST: &str = "high-contrast";
pub const FLAG_CONTRAST_SOFT: &str = "contrast-soft";
pub const FLAG_CONTRAST_MEDIUM: &str = "contrast-medium";
pub const FLAG_CONTRAST_HIGH: &str = "contrast-high";
pub const FLAG_LETTER_SPACING: &str = "letter-spacing";
pub const FLAG_REDUCED_MOTION: &str = "reduced-motion";
pub const FLAG_KEYBOARD_NAV: &str = "keyboard-nav";
pub const FLAG_LARGE_BUTTONS: &str = "large-buttons";

pub const VAR_FONT_SCALE: &str = "--font-scale";
pub const VAR_ACCENT_COLOR: &str = "--accent-color";

/// Receives style effects on the page root.
///
/// This trait allows swapping implementations (a real DOM/root binding vs
/// the in-memory `RootStyle`).
pub trait StyleSink: Send {
    /// Enable or disable a named flag.
    fn set_flag(&mut self, name: &str, enabled: bool);

    /// Set a named variable, or clear it with `None`.
    fn set_var(&mut self, name: &str, value: Option<&str>);
}

/// Project the full preference record onto a style sink.
///
/// The three contrast-level flags are mutually exclusive; exactly the one
/// matching the current level is set.
pub fn apply_preferences(prefs: &AccessibilityPreferences, sink: &mut dyn StyleSink) {
    sink.set_flag(FLAG_HIGH_CONTRAST, prefs.high_contrast);

    sink.set_flag(
        FLAG_CONTRAST_SOFT,
        prefs.contrast_level == crate::prefs::ContrastLevel::Soft,
    );
    sink.set_flag(
        FLAG_CONTRAST_MEDIUM,
        prefs.contrast_level == crate::prefs::ContrastLevel::Medium,
    );
    sink.set_flag(
        FLAG_CONTRAST_HIGH,
        prefs.contrast_level == crate::prefs::ContrastLevel::High,
    );

    sink.set_var(VAR_FONT_SCALE, Some(&format!("{:.2}", prefs.font_scale)));

    sink.set_flag(FLAG_LETTER_SPACING, prefs.letter_spacing);
    sink.set_flag(FLAG_REDUCED_MOTION, prefs.reduced_motion);
    sink.set_flag(FLAG_KEYBOARD_NAV, prefs.keyboard_navigation);
    sink.set_flag(FLAG_LARGE_BUTTONS, prefs.large_buttons);

    sink.set_var(VAR_ACCENT_COLOR, prefs.accent_color.as_deref());
}

/// In-memory style root.
///
/// Records the current flag and variable state; doubles as the default sink
/// and as the assertion point in tests.
#[derive(Debug, Default)]
pub struct RootStyle {
    flags: BTreeMap<String, bool>,
    vars: BTreeMap<String, String>,
}

impl RootStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Names of all currently enabled flags.
    pub fn enabled_flags(&self) -> Vec<&str> {
        self.flags
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl StyleSink for RootStyle {
    fn set_flag(&mut self, name: &str, enabled: bool) {
        self.flags.insert(name.to_string(), enabled);
    }

    fn set_var(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(v) => {
                self.vars.insert(name.to_string(), v.to_string());
            }
            None => {
                self.vars.remove(name);
            }
        }
    }
}
