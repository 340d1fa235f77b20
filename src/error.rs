//! Error types for voznav.
//!
//! Engine-level speech errors never appear here: they are classified into
//! state at the recognition boundary (see `recognition::error`). This enum
//! covers configuration, preference storage, and dispatch faults.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoznavError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    // Preference storage errors
    #[error("Preference storage error: {message}")]
    Storage { message: String },

    #[error("Failed to encode preference record: {0}")]
    PrefsEncode(#[from] serde_json::Error),

    // Command dispatch errors
    #[error("Command action failed: {message}")]
    ActionFailed { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoznavError>;

/// Receives faults from fire-and-forget work (command actions, persistence,
/// restart attempts) that must not interrupt the owning loop.
pub trait Reporter: Send + Sync {
    fn report(&self, source: &str, message: &str);
}

/// Default reporter that writes to stderr.
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&self, source: &str, message: &str) {
        eprintln!("voznav [{}]: {}", source, message);
    }
}

/// Reporter that collects reports in memory, for tests and diagnostics.
#[derive(Default)]
pub struct CollectingReporter {
    reports: std::sync::Mutex<Vec<(String, String)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all reports received so far.
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().expect("reporter lock poisoned").clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, source: &str, message: &str) {
        self.reports
            .lock()
            .expect("reporter lock poisoned")
            .push((source.to_string(), message.to_string()));
    }
}
