//! Scripted reply generation.
//!
//! The keyword engine stands in for a real groundwater data backend. Anything
//! implementing [`ReplyEngine`] can replace it, provided it answers quickly
//! enough to fit inside the reply delay.

use std::sync::{Arc, RwLock};

use crate::error::ChatError;

/// Maps a user utterance to the bot's reply.
pub trait ReplyEngine: Send + Sync {
    fn compute_reply(&self, utterance: &str) -> String;
}

/// Keyword matcher over the lower-cased utterance. First match wins, in this
/// order: water level / groundwater, thanks, help, fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordReplyEngine;

/// Placeholder figure quoted by data-style replies.
const AVERAGE_DEPTH_METERS: f64 = 15.3;

impl ReplyEngine for KeywordReplyEngine {
    fn compute_reply(&self, utterance: &str) -> String {
        let lower = utterance.to_lowercase();
        if lower.contains("water level") || lower.contains("groundwater") {
            format!(
                "Based on the latest data, groundwater levels in \"{}\" show seasonal variations with an average depth of {:.1} meters. Would you like more specific data?",
                utterance, AVERAGE_DEPTH_METERS
            )
        } else if lower.contains("thank") {
            "You're welcome! Feel free to ask about any other groundwater-related topics. 💧"
                .to_string()
        } else if lower.contains("help") {
            "I can help you with groundwater level data, trends, seasonal variations, and regional comparisons. What would you like to know?"
                .to_string()
        } else {
            format!(
                "I found some information related to \"{}\". Groundwater monitoring shows that levels vary based on seasonal rainfall, human usage, and geological factors. Would you like me to elaborate?",
                utterance
            )
        }
    }
}

/// Swappable slot holding the current reply engine.
///
/// Deferred replies resolve the engine through this handle when they fire, so
/// an engine swapped in after a message was sent still answers it.
#[derive(Clone)]
pub struct ReplyHandle {
    slot: Arc<RwLock<Arc<dyn ReplyEngine>>>,
}

impl std::fmt::Debug for ReplyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyHandle").finish_non_exhaustive()
    }
}

impl Default for ReplyHandle {
    fn default() -> Self {
        Self::new(Arc::new(KeywordReplyEngine))
    }
}

impl ReplyHandle {
    pub fn new(engine: Arc<dyn ReplyEngine>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(engine)),
        }
    }

    /// The engine installed right now.
    pub fn current(&self) -> Result<Arc<dyn ReplyEngine>, ChatError> {
        let guard = self
            .slot
            .read()
            .map_err(|e| ChatError::ReplyEngineUnavailable(format!("lock poisoned: {}", e)))?;
        Ok(Arc::clone(&guard))
    }

    /// Install a new engine; every clone of this handle sees it.
    pub fn replace(&self, engine: Arc<dyn ReplyEngine>) -> Result<(), ChatError> {
        let mut guard = self
            .slot
            .write()
            .map_err(|e| ChatError::ReplyEngineUnavailable(format!("lock poisoned: {}", e)))?;
        *guard = engine;
        tracing::info!("Reply engine replaced");
        Ok(())
    }

    /// Compute a reply with the current engine, falling back to the keyword
    /// engine if the slot cannot be read.
    pub fn reply_to(&self, utterance: &str) -> String {
        match self.current() {
            Ok(engine) => engine.compute_reply(utterance),
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to keyword replies");
                KeywordReplyEngine.compute_reply(utterance)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str) -> String {
        KeywordReplyEngine.compute_reply(text)
    }

    #[test]
    fn test_groundwater_rule_embeds_utterance_and_figure() {
        let r = reply("What's the groundwater level?");
        assert!(r.starts_with("Based on the latest data"));
        assert!(r.contains("\"What's the groundwater level?\""));
        assert!(r.contains("15.3 meters"));
    }

    #[test]
    fn test_water_level_phrase_matches_rule_one() {
        assert!(reply("Water Level in Chennai").starts_with("Based on the latest data"));
    }

    #[test]
    fn test_groundwater_beats_thank() {
        let r = reply("thanks, and tell me about groundwater");
        assert!(r.starts_with("Based on the latest data"));
    }

    #[test]
    fn test_thank_beats_help() {
        let r = reply("Thank you for the help");
        assert!(r.starts_with("You're welcome!"));
    }

    #[test]
    fn test_help_rule() {
        let r = reply("HELP me out");
        assert!(r.starts_with("I can help you with groundwater level data"));
    }

    #[test]
    fn test_fallback_embeds_original_casing() {
        let r = reply("Rainfall in Kerala");
        assert!(r.starts_with("I found some information related to \"Rainfall in Kerala\""));
    }

    #[test]
    fn test_matching_is_substring_based() {
        // "thankful" contains "thank"
        assert!(reply("I'm thankful").starts_with("You're welcome!"));
        // "water" alone is not "water level"
        assert!(reply("water quality").starts_with("I found some information"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(reply("same input"), reply("same input"));
    }

    struct Echo;

    impl ReplyEngine for Echo {
        fn compute_reply(&self, utterance: &str) -> String {
            format!("echo: {}", utterance)
        }
    }

    #[test]
    fn test_handle_defaults_to_keyword_engine() {
        let handle = ReplyHandle::default();
        assert!(handle.reply_to("help").starts_with("I can help"));
    }

    #[test]
    fn test_replace_is_visible_through_clones() {
        let handle = ReplyHandle::default();
        let scheduled = handle.clone();
        handle.replace(Arc::new(Echo)).unwrap();
        assert_eq!(scheduled.reply_to("hi"), "echo: hi");
    }
}
