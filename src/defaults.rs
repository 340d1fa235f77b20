//! Default constants for voznav.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Locale used for both speech recognition and speech synthesis.
///
/// The engine is single-locale by design; recognition grammars and spoken
/// feedback share it.
pub const LOCALE: &str = "es-ES";

/// Speech synthesis rate (1.0 is the platform's normal speed).
pub const TTS_RATE: f32 = 1.0;

/// Speech synthesis pitch (1.0 is the platform's normal pitch).
pub const TTS_PITCH: f32 = 1.0;

/// Delay before a recognition session is restarted after it ends, in
/// milliseconds.
///
/// The continuation flag is re-checked when the delay elapses, so a feature
/// that was disabled during the window suppresses the restart.
pub const RESTART_DELAY_MS: u64 = 500;

/// Window during which an identical hover text is not spoken again, in
/// milliseconds.
pub const HOVER_DEDUPE_MS: u64 = 900;

/// Maximum length of hover-extracted text, in characters.
pub const HOVER_TEXT_MAX: usize = 300;

/// Lifetime of the "last feedback" indicator value, in milliseconds.
pub const FEEDBACK_CLEAR_MS: u64 = 3000;

/// Delay between speaking a navigation confirmation and performing the
/// navigation, in milliseconds.
///
/// Long enough for synthesis to start, short enough to feel immediate.
pub const NAV_DELAY_MS: u64 = 350;

/// Grace period the diagnostics probe waits for an immediate recognition
/// error, in milliseconds.
pub const PROBE_GRACE_MS: u64 = 1800;

/// Hard stop for the diagnostics recognition probe, in milliseconds.
pub const PROBE_TIMEOUT_MS: u64 = 5000;

/// Lower bound of the font scale preference.
pub const FONT_SCALE_MIN: f32 = 0.8;

/// Upper bound of the font scale preference.
pub const FONT_SCALE_MAX: f32 = 1.6;

/// Step applied by the "larger text" / "smaller text" voice commands.
pub const FONT_SCALE_STEP: f32 = 0.1;

/// Storage key under which the preference record persists.
///
/// The record is a single JSON object with no version field; readers must
/// treat missing fields as defaults.
pub const STORAGE_KEY: &str = "voznav.accessibility";

/// Maximum number of retained diagnostic log lines.
pub const DIAG_LOG_CAP: usize = 200;
