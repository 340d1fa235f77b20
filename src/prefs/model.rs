//! The accessibility preference record and its partial-update patch.

use crate::defaults;
use serde::{Deserialize, Serialize};

/// Contrast intensity applied when high contrast is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContrastLevel {
    Soft,
    #[default]
    Medium,
    High,
}

impl ContrastLevel {
    /// Next level in the soft → medium → high → soft cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Soft => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Soft,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// The full preference record.
///
/// Persisted as a single JSON object with no version field; missing fields
/// deserialize to defaults so older records keep loading after schema
/// growth. Field names follow the persisted camelCase layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilityPreferences {
    pub high_contrast: bool,
    pub contrast_level: ContrastLevel,
    pub font_scale: f32,
    pub letter_spacing: bool,
    pub reduced_motion: bool,
    pub keyboard_navigation: bool,
    pub large_buttons: bool,
    pub tts_enabled: bool,
    pub hover_to_speak: bool,
    pub live_transcription_enabled: bool,
    pub captions_enabled: bool,
    pub accent_color: Option<String>,
}

impl Default for AccessibilityPreferences {
    fn default() -> Self {
        Self {
            high_contrast: false,
            contrast_level: ContrastLevel::Medium,
            font_scale: 1.0,
            letter_spacing: false,
            reduced_motion: false,
            keyboard_navigation: false,
            large_buttons: false,
            tts_enabled: true,
            hover_to_speak: false,
            live_transcription_enabled: false,
            captions_enabled: false,
            accent_color: None,
        }
    }
}

impl AccessibilityPreferences {
    /// Clamp the font scale into its allowed range.
    ///
    /// Applied on every write and on load, so an out-of-range value can
    /// never be observed.
    pub fn clamp_font_scale(&mut self) {
        self.font_scale = clamp_font_scale(self.font_scale);
    }
}

/// Clamp a raw font scale value into `[FONT_SCALE_MIN, FONT_SCALE_MAX]`.
pub fn clamp_font_scale(value: f32) -> f32 {
    value.clamp(defaults::FONT_SCALE_MIN, defaults::FONT_SCALE_MAX)
}

/// A partial update: every field optional, `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefsPatch {
    pub high_contrast: Option<bool>,
    pub contrast_level: Option<ContrastLevel>,
    pub font_scale: Option<f32>,
    pub letter_spacing: Option<bool>,
    pub reduced_motion: Option<bool>,
    pub keyboard_navigation: Option<bool>,
    pub large_buttons: Option<bool>,
    pub tts_enabled: Option<bool>,
    pub hover_to_speak: Option<bool>,
    pub live_transcription_enabled: Option<bool>,
    pub captions_enabled: Option<bool>,
    /// `Some(None)` clears the accent color, `Some(Some(c))` sets it.
    pub accent_color: Option<Option<String>>,
}

impl PrefsPatch {
    /// Apply this patch to a record, clamping where required.
    pub fn apply(&self, prefs: &mut AccessibilityPreferences) {
        if let Some(v) = self.high_contrast {
            prefs.high_contrast = v;
        }
        if let Some(v) = self.contrast_level {
            prefs.contrast_level = v;
        }
        if let Some(v) = self.font_scale {
            prefs.font_scale = clamp_font_scale(v);
        }
        if let Some(v) = self.letter_spacing {
            prefs.letter_spacing = v;
        }
        if let Some(v) = self.reduced_motion {
            prefs.reduced_motion = v;
        }
        if let Some(v) = self.keyboard_navigation {
            prefs.keyboard_navigation = v;
        }
        if let Some(v) = self.large_buttons {
            prefs.large_buttons = v;
        }
        if let Some(v) = self.tts_enabled {
            prefs.tts_enabled = v;
        }
        if let Some(v) = self.hover_to_speak {
            prefs.hover_to_speak = v;
        }
        if let Some(v) = self.live_transcription_enabled {
            prefs.live_transcription_enabled = v;
        }
        if let Some(v) = self.captions_enabled {
            prefs.captions_enabled = v;
        }
        if let Some(ref v) = self.accent_color {
            prefs.accent_color = v.clone();
        }
    }

    pub fn high_contrast(value: bool) -> Self {
        Self {
            high_contrast: Some(value),
            ..Self::default()
        }
    }

    pub fn font_scale(value: f32) -> Self {
        Self {
            font_scale: Some(value),
            ..Self::default()
        }
    }

    pub fn captions_enabled(value: bool) -> Self {
        Self {
            captions_enabled: Some(value),
            ..Self::default()
        }
    }
}
