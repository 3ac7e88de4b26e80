//! Conversational core for HydroIntel.
//!
//! Owns the live message thread, the scripted reply engine, the recent
//! conversation sidebar, and the event loop that ties typed input, speech
//! transcripts, and delayed replies together on a single queue.

pub mod controller;
pub mod error;
pub mod history;
pub mod reply;
pub mod store;

pub use controller::{ChatController, ChatEvent, Flow, UiCommand};
pub use error::ChatError;
pub use history::{CaptureOutcome, HistoryIndex};
pub use reply::{KeywordReplyEngine, ReplyEngine, ReplyHandle};
pub use store::{ConversationStore, PendingReply, ReplyOutcome};
