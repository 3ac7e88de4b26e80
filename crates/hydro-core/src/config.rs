use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the HydroIntel chat.
///
/// Loaded from `~/.hydrointel/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HydroConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl HydroConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HydroConfig = toml::from_str(&content)?;
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
        let content = toml::to_string_pretty(self)?;
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
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// What to do with a reply whose conversation was replaced before it landed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReplyPolicy {
    /// Append the reply to whatever thread is live when it fires.
    #[default]
    Deliver,
    /// Drop the reply if the live thread is no longer the one it was scheduled for.
    Discard,
}

/// Conversation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay between a user message and the scripted reply, in milliseconds.
    pub reply_delay_ms: u64,
    /// Bot message that opens every new conversation.
    pub greeting: String,
    /// Maximum number of conversations kept in the sidebar.
    pub history_limit: usize,
    /// Title length (in characters) before truncation with "...".
    pub title_max_chars: usize,
    pub stale_replies: StaleReplyPolicy,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1500,
            greeting: "Hello! Ask me about groundwater levels 🌊".to_string(),
            history_limit: 10,
            title_max_chars: 30,
            stale_replies: StaleReplyPolicy::Deliver,
        }
    }
}

/// Speech recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether a speech recognizer should be probed at startup.
    pub enabled: bool,
    /// BCP 47 language tag handed to the recognizer.
    pub language: String,
    /// Keep listening after the first result.
    pub continuous: bool,
    /// Emit partial transcripts while the user is still speaking.
    pub interim_results: bool,
    /// Transcripts replayed by the scripted recognizer, one per listening session.
    pub transcripts: Vec<String>,
    /// Delay before the scripted recognizer reports a result, in milliseconds.
    pub result_delay_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            language: "en-US".to_string(),
            continuous: false,
            interim_results: false,
            transcripts: Vec::new(),
            result_delay_ms: 800,
        }
    }
}

/// Terminal rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    /// `chrono` format string for message and history times.
    pub time_format: String,
    /// `chrono` format string for history dates.
    pub date_format: String,
    pub placeholder: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "HydroIntel Chatbot".to_string(),
            time_format: "%H:%M".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            placeholder: "Type a message about groundwater levels...".to_string(),
        }
    }
}
