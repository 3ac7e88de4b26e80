use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp type used for messages and history records.
pub type Timestamp = DateTime<Local>;

// =============================================================================
// Enums
// =============================================================================

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person typing or speaking.
    User,
    /// The scripted assistant.
    Bot,
}

impl Sender {
    /// Single-letter avatar shown next to each message.
    pub fn avatar(&self) -> char {
        match self {
            Sender::User => 'Y',
            Sender::Bot => 'B',
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// Identity of a live thread. Regenerated whenever the thread is replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub Uuid);

impl ThreadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Messages and records
// =============================================================================

/// A single chat message. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: Timestamp,
}

impl Message {
    /// Create a message stamped with the current local time.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }
}

/// A past conversation listed in the sidebar.
///
/// `messages` is a snapshot taken when the record was created; later activity
/// in the live thread never changes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<Message>,
    pub timestamp: Timestamp,
    /// Exact text of the user message the record was keyed on.
    pub dedup_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display_and_avatar() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Bot.to_string(), "bot");
        assert_eq!(Sender::User.avatar(), 'Y');
        assert_eq!(Sender::Bot.avatar(), 'B');
    }

    #[test]
    fn test_message_constructors() {
        let before = Local::now();
        let user = Message::user("hi");
        let bot = Message::bot("hello");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text, "hi");
        assert_eq!(bot.sender, Sender::Bot);
        assert!(user.timestamp >= before);
    }

    #[test]
    fn test_thread_ids_are_unique() {
        assert_ne!(ThreadId::new(), ThreadId::new());
    }

    #[test]
    fn test_sender_serde_snake_case() {
        let toml_str = toml::to_string(&Message::user("x")).unwrap();
        assert!(toml_str.contains("sender = \"user\""));
    }
}
