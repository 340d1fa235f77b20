use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;
use std::time::Duration;

/// Root engine configuration.
///
/// This tunes the engine itself (locale, timing windows, storage location).
/// It is distinct from the user's accessibility preferences, which live in
/// their own persisted record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub voice: VoiceConfig,
    pub timing: TimingConfig,
    pub storage: StorageConfig,
}

/// Speech input/output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceConfig {
    /// Locale shared by recognition and synthesis.
    pub locale: String,
    /// Synthesis rate, 1.0 is normal.
    pub rate: f32,
    /// Synthesis pitch, 1.0 is normal.
    pub pitch: f32,
}

/// Timing windows, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub restart_delay_ms: u64,
    pub hover_dedupe_ms: u64,
    pub feedback_clear_ms: u64,
    pub nav_delay_ms: u64,
    pub probe_grace_ms: u64,
    pub probe_timeout_ms: u64,
}

/// Preference storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the persisted preference record.
    /// Defaults to the platform data directory when absent.
    pub path: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            locale: defaults::LOCALE.to_string(),
            rate: defaults::TTS_RATE,
            pitch: defaults::TTS_PITCH,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: defaults::RESTART_DELAY_MS,
            hover_dedupe_ms: defaults::HOVER_DEDUPE_MS,
            feedback_clear_ms: defaults::FEEDBACK_CLEAR_MS,
            nav_delay_ms: defaults::NAV_DELAY_MS,
            probe_grace_ms: defaults::PROBE_GRACE_MS,
            probe_timeout_ms: defaults::PROBE_TIMEOUT_MS,
        }
    }
}

impl TimingConfig {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn hover_dedupe(&self) -> Duration {
        Duration::from_millis(self.hover_dedupe_ms)
    }

    pub fn feedback_clear(&self) -> Duration {
        Duration::from_millis(self.feedback_clear_ms)
    }

    pub fn nav_delay(&self) -> Duration {
        Duration::from_millis(self.nav_delay_ms)
    }

    pub fn probe_grace(&self) -> Duration {
        Duration::from_millis(self.probe_grace_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist.
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported environment variables:
    /// - VOZNAV_LOCALE → voice.locale
    /// - VOZNAV_STORAGE_PATH → storage.path
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(locale) = std::env::var("VOZNAV_LOCALE")
            && !locale.is_empty()
        {
            self.voice.locale = locale;
        }

        if let Ok(path) = std::env::var("VOZNAV_STORAGE_PATH")
            && !path.is_empty()
        {
            self.storage.path = Some(path);
        }

        self
    }

    /// Get the default configuration file path.
    ///
    /// Returns ~/.config/voznav/config.toml on Linux.
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("voznav")
            .join("config.toml")
    }
}
