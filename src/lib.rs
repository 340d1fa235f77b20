//! voznav - Voice-driven accessibility engine
//!
//! Voice commands, single-flight speech feedback, hover reading, and live
//! captions for the recruitment application, behind platform-neutral
//! engine seams.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod captions;
#[cfg(feature = "cli")]
pub mod cli;
pub mod commands;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod hover;
pub mod prefs;
pub mod recognition;
pub mod speech;

// Core seams (engine → manager → consumers)
pub use recognition::engine::{RecognitionEngine, RecognizerBridge};
pub use recognition::manager::RecognitionManager;
pub use speech::synthesizer::Synthesizer;

// Composition root
pub use engine::{AccessibilityEngine, EnginePorts, KeyChord, VOICE_TOGGLE_CHORD};

// Error handling
pub use error::{Reporter, Result, VoznavError};

// Config
pub use config::EngineConfig;

// Preference state
pub use prefs::{AccessibilityPreferences, PrefsPatch, PrefsStore};

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.1+abc1234"` when git hash is available, `"0.3.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
