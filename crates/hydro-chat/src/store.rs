//! Conversation store: the live thread, typing flag, selection, and history.
//!
//! The store is plain owned state with no timers. `send` hands back a
//! [`PendingReply`] ticket; whoever owns the clock delivers it later through
//! [`ConversationStore::deliver_reply`].

use uuid::Uuid;

use hydro_core::config::{ChatConfig, StaleReplyPolicy};
use hydro_core::types::{ConversationRecord, Message, ThreadId};

use crate::error::ChatError;
use crate::history::{CaptureOutcome, HistoryIndex};

/// A reply owed to a user message.
///
/// Carries the text that triggered it so the reply never depends on the
/// pending-input buffer at fire time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReply {
    pub utterance: String,
    pub thread_id: ThreadId,
}

/// What happened to a delivered reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Appended to the live thread.
    Delivered { history: CaptureOutcome },
    /// Dropped because its thread was replaced and the policy is `Discard`.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct ConversationStore {
    thread: Vec<Message>,
    thread_id: ThreadId,
    pending_input: String,
    outstanding_replies: usize,
    selected: Option<Uuid>,
    history: HistoryIndex,
    greeting: String,
    stale_policy: StaleReplyPolicy,
}

impl ConversationStore {
    /// Create a store holding a fresh conversation.
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            thread: vec![Message::bot(config.greeting.clone())],
            thread_id: ThreadId::new(),
            pending_input: String::new(),
            outstanding_replies: 0,
            selected: None,
            history: HistoryIndex::new(config.history_limit, config.title_max_chars),
            greeting: config.greeting.clone(),
            stale_policy: config.stale_replies,
        }
    }

    // -- Read accessors --

    pub fn thread(&self) -> &[Message] {
        &self.thread
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    pub fn history(&self) -> &HistoryIndex {
        &self.history
    }

    pub fn selected(&self) -> Option<&ConversationRecord> {
        self.selected.and_then(|id| self.history.get(id))
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected
    }

    /// True while any sent message is still waiting for its reply.
    pub fn is_typing(&self) -> bool {
        self.outstanding_replies > 0
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Whether the pending input is sendable (drives the send control).
    pub fn can_send(&self) -> bool {
        !self.pending_input.trim().is_empty()
    }

    // -- Mutations --

    /// Append a user message and return the reply it is owed.
    ///
    /// `None` uses the pending-input buffer. Blank text is ignored and returns
    /// `None` without touching any state.
    pub fn send(&mut self, text: Option<&str>) -> Option<PendingReply> {
        let message_text = match text {
            Some(t) => t.to_string(),
            None => self.pending_input.clone(),
        };
        if message_text.trim().is_empty() {
            tracing::debug!("Ignoring empty message");
            return None;
        }

        let message = Message::user(message_text.clone());
        self.thread.push(message);
        self.pending_input.clear();
        self.outstanding_replies += 1;
        tracing::debug!(
            thread_id = %self.thread_id,
            text_len = message_text.len(),
            "User message appended"
        );

        Some(PendingReply {
            utterance: message_text,
            thread_id: self.thread_id,
        })
    }

    /// Land a reply computed for `ticket`.
    pub fn deliver_reply(&mut self, ticket: &PendingReply, reply: String) -> ReplyOutcome {
        self.outstanding_replies = self.outstanding_replies.saturating_sub(1);

        if ticket.thread_id != self.thread_id {
            match self.stale_policy {
                StaleReplyPolicy::Discard => {
                    tracing::info!(
                        scheduled_for = %ticket.thread_id,
                        live = %self.thread_id,
                        "Discarding reply for a replaced conversation"
                    );
                    return ReplyOutcome::Discarded;
                }
                StaleReplyPolicy::Deliver => {
                    tracing::debug!(
                        scheduled_for = %ticket.thread_id,
                        live = %self.thread_id,
                        "Delivering reply to a replaced conversation"
                    );
                }
            }
        }

        self.thread.push(Message::bot(reply));
        let history = self.history.capture(&self.thread);
        ReplyOutcome::Delivered { history }
    }

    /// Reset to a fresh conversation holding only the greeting.
    ///
    /// History is untouched.
    pub fn start_new(&mut self) {
        self.selected = None;
        self.thread = vec![Message::bot(self.greeting.clone())];
        self.thread_id = ThreadId::new();
        self.pending_input.clear();
        tracing::info!(thread_id = %self.thread_id, "New conversation started");
    }

    /// Replace the live thread with a copy of a past conversation.
    pub fn load_past(&mut self, record_id: Uuid) -> Result<(), ChatError> {
        let record = self
            .history
            .get(record_id)
            .ok_or(ChatError::ConversationNotFound(record_id))?;
        self.thread = record.messages.clone();
        self.selected = Some(record_id);
        self.thread_id = ThreadId::new();
        tracing::info!(record_id = %record_id, messages = self.thread.len(), "Past conversation loaded");

        // Same trigger as any other thread change; the record's own key makes
        // this a duplicate.
        self.history.capture(&self.thread);
        Ok(())
    }

    /// Load the conversation at a sidebar position (0 = most recent).
    pub fn load_position(&mut self, position: usize) -> Result<Uuid, ChatError> {
        let id = self
            .history
            .at(position)
            .map(|r| r.id)
            .ok_or(ChatError::NoSuchPosition(position))?;
        self.load_past(id)?;
        Ok(id)
    }
}

// =============================================================================
// Tests
// =============================================================================
