use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MindfulError, Result};

/// Top-level configuration for the Mindful companion.
///
/// Loaded from `~/.mindful/config.toml` by default. Every section falls back
/// to its defaults when absent, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MindfulConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl MindfulConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MindfulConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MindfulError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Port for the local HTTP API.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            port: 3040,
        }
    }
}

/// Live microphone listening parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Ambient-noise calibration before listening, in milliseconds.
    pub calibration_ms: u64,
    /// Speech must begin within this many seconds.
    pub timeout_secs: u64,
    /// Speech is cut off after this many seconds.
    pub phrase_limit_secs: u64,
    /// Silence that ends a phrase, in milliseconds.
    pub pause_ms: u64,
    /// Minimum speech length for a phrase to count, in milliseconds.
    pub phrase_min_ms: u64,
    /// Silence kept on either side of a phrase, in milliseconds.
    pub non_speaking_ms: u64,
    /// Initial RMS energy threshold separating speech from silence.
    pub energy_threshold: f64,
    /// Longest a live source may go without delivering a frame once speech
    /// has started, in milliseconds.
    pub stall_ms: u64,
    /// Keep adapting the threshold while waiting for speech.
    pub dynamic_energy: bool,
    /// Duration of one captured frame, in milliseconds.
    pub frame_ms: u64,
    /// Microphone sample rate in Hz.
    pub sample_rate: u32,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            calibration_ms: 500,
            timeout_secs: 5,
            phrase_limit_secs: 15,
            pause_ms: 800,
            phrase_min_ms: 300,
            non_speaking_ms: 500,
            energy_threshold: 300.0,
            stall_ms: 2_000,
            dynamic_energy: true,
            frame_ms: 64,
            sample_rate: 16_000,
        }
    }
}

/// Remote speech recognition service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Recognition endpoint URL.
    pub endpoint: String,
    /// API key sent as the `key` query parameter. Empty means the recognizer
    /// uses the public Chromium key.
    pub api_key: String,
    /// BCP-47 language tag.
    pub language: String,
    /// Upper bound on one recognition round trip, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://www.google.com/speech-api/v2/recognize".to_string(),
            api_key: String::new(),
            language: "en-US".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// HTTP API limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Maximum number of live sessions held in memory.
    pub max_sessions: usize,
    /// A session untouched for this many seconds is dropped.
    pub session_idle_secs: u64,
    /// Requests allowed per second across all clients.
    pub rate_limit_per_sec: u64,
    /// Largest accepted request body (audio uploads included), in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_sessions: 256,
            session_idle_secs: 30 * 60,
            rate_limit_per_sec: 50,
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}
