//! Error types for the conversational core.

use hydro_core::error::HydroError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("conversation not found: {0}")]
    ConversationNotFound(uuid::Uuid),
    #[error("no conversation at position {0}")]
    NoSuchPosition(usize),
    #[error("reply engine unavailable: {0}")]
    ReplyEngineUnavailable(String),
    #[error("speech error: {0}")]
    SpeechError(String),
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl From<HydroError> for ChatError {
    fn from(err: HydroError) -> Self {
        match err {
            HydroError::Speech(msg) => ChatError::SpeechError(msg),
            other => ChatError::ConfigError(other.to_string()),
        }
    }
}
