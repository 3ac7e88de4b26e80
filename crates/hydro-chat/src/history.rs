//! Recent-conversation index for the sidebar.
//!
//! Records are keyed on the exact text of the user message that preceded the
//! bot reply which triggered capture. The first record for a key wins; later
//! captures with the same key are ignored even if the conversation moved on.

use chrono::Local;
use uuid::Uuid;

use hydro_core::types::{ConversationRecord, Message, Sender};

/// Result of a capture attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A new record was prepended.
    Added(Uuid),
    /// A record with the same key already exists.
    Duplicate,
    /// The thread does not end in a bot reply preceded by a user message,
    /// or the index keeps no history at all.
    NotEligible,
}

/// Most-recent-first list of past conversations, capped at `limit`.
#[derive(Debug, Clone)]
pub struct HistoryIndex {
    records: Vec<ConversationRecord>,
    limit: usize,
    title_max_chars: usize,
}

impl HistoryIndex {
    pub fn new(limit: usize, title_max_chars: usize) -> Self {
        Self {
            records: Vec::new(),
            limit,
            title_max_chars,
        }
    }

    pub fn records(&self) -> &[ConversationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ConversationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Record at a sidebar position (0 = most recent).
    pub fn at(&self, position: usize) -> Option<&ConversationRecord> {
        self.records.get(position)
    }

    /// Snapshot `thread` if it just received a bot reply.
    ///
    /// A zero limit keeps no history, so nothing is ever eligible.
    pub fn capture(&mut self, thread: &[Message]) -> CaptureOutcome {
        if self.limit == 0 || thread.len() < 2 {
            return CaptureOutcome::NotEligible;
        }
        if thread.last().map(|m| m.sender) != Some(Sender::Bot) {
            return CaptureOutcome::NotEligible;
        }
        let Some(last_user) = thread.iter().rev().find(|m| m.sender == Sender::User) else {
            return CaptureOutcome::NotEligible;
        };

        if self.records.iter().any(|r| r.dedup_key == last_user.text) {
            tracing::debug!("Conversation already in history");
            return CaptureOutcome::Duplicate;
        }

        let record = ConversationRecord {
            id: Uuid::new_v4(),
            title: derive_title(&last_user.text, self.title_max_chars),
            messages: thread.to_vec(),
            timestamp: Local::now(),
            dedup_key: last_user.text.clone(),
        };
        let id = record.id;
        tracing::debug!(record_id = %id, title = %record.title, "Conversation added to history");

        self.records.insert(0, record);
        if self.records.len() > self.limit {
            let evicted = self.records.len() - self.limit;
            self.records.truncate(self.limit);
            tracing::debug!(evicted, "Oldest conversations evicted from history");
        }
        CaptureOutcome::Added(id)
    }
}

/// Shorten `text` to `max_chars` characters plus "..." when it is longer.
pub fn derive_title(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(user: &str) -> Vec<Message> {
        vec![
            Message::bot("Hello!"),
            Message::user(user),
            Message::bot("reply"),
        ]
    }

    #[test]
    fn test_title_truncation_35_chars() {
        let text = "a".repeat(35);
        let title = derive_title(&text, 30);
        assert_eq!(title.chars().count(), 33);
        assert!(title.ends_with("..."));
        assert_eq!(&title[..30], &text[..30]);
    }

    #[test]
    fn test_title_short_unmodified() {
        assert_eq!(derive_title("0123456789", 30), "0123456789");
    }

    #[test]
    fn test_title_exactly_at_limit_unmodified() {
        let text = "b".repeat(30);
        assert_eq!(derive_title(&text, 30), text);
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let text = "💧".repeat(31);
        let title = derive_title(&text, 30);
        assert_eq!(title.chars().count(), 33);
    }

    #[test]
    fn test_capture_adds_snapshot() {
        let mut index = HistoryIndex::new(10, 30);
        let thread = exchange("groundwater in Delhi");
        let outcome = index.capture(&thread);
        assert!(matches!(outcome, CaptureOutcome::Added(_)));
        assert_eq!(index.len(), 1);
        let record = index.at(0).unwrap();
        assert_eq!(record.title, "groundwater in Delhi");
        assert_eq!(record.dedup_key, "groundwater in Delhi");
        assert_eq!(record.messages, thread);
    }

    #[test]
    fn test_capture_requires_trailing_bot_message() {
        let mut index = HistoryIndex::new(10, 30);
        let thread = vec![Message::bot("Hello!"), Message::user("hi")];
        assert_eq!(index.capture(&thread), CaptureOutcome::NotEligible);
        assert!(index.is_empty());
    }

    #[test]
    fn test_capture_requires_two_messages() {
        let mut index = HistoryIndex::new(10, 30);
        assert_eq!(
            index.capture(&[Message::bot("Hello!")]),
            CaptureOutcome::NotEligible
        );
    }

    #[test]
    fn test_capture_without_user_message_is_noop() {
        let mut index = HistoryIndex::new(10, 30);
        let thread = vec![Message::bot("a"), Message::bot("b")];
        assert_eq!(index.capture(&thread), CaptureOutcome::NotEligible);
    }

    #[test]
    fn test_capture_uses_most_recent_user_message() {
        let mut index = HistoryIndex::new(10, 30);
        let mut thread = exchange("first question");
        thread.push(Message::user("second question"));
        thread.push(Message::bot("second reply"));
        index.capture(&thread);
        assert_eq!(index.at(0).unwrap().dedup_key, "second question");
    }

    #[test]
    fn test_duplicate_key_first_wins() {
        let mut index = HistoryIndex::new(10, 30);
        let first = exchange("same text");
        index.capture(&first);
        let mut second = exchange("same text");
        second.push(Message::bot("extra"));
        assert_eq!(index.capture(&second), CaptureOutcome::Duplicate);
        assert_eq!(index.len(), 1);
        assert_eq!(index.at(0).unwrap().messages.len(), 3);
    }

    #[test]
    fn test_dedup_is_case_sensitive_and_untrimmed() {
        let mut index = HistoryIndex::new(10, 30);
        index.capture(&exchange("Groundwater"));
        index.capture(&exchange("groundwater"));
        index.capture(&exchange("groundwater "));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut index = HistoryIndex::new(10, 30);
        for i in 0..11 {
            index.capture(&exchange(&format!("question {}", i)));
        }
        assert_eq!(index.len(), 10);
        assert_eq!(index.at(0).unwrap().dedup_key, "question 10");
        assert!(index
            .records()
            .iter()
            .all(|r| r.dedup_key != "question 0"));
    }

    #[test]
    fn test_get_by_id() {
        let mut index = HistoryIndex::new(10, 30);
        let CaptureOutcome::Added(id) = index.capture(&exchange("x")) else {
            panic!("expected a new record");
        };
        assert_eq!(index.get(id).unwrap().dedup_key, "x");
        assert!(index.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let mut index = HistoryIndex::new(0, 30);
        assert_eq!(
            index.capture(&exchange("groundwater in Delhi")),
            CaptureOutcome::NotEligible
        );
        assert!(index.is_empty());
    }
}
