//! Chat controller: the single event queue driving the conversation store.
//!
//! Typed input, UI commands, speech recognizer signals, and delayed replies all
//! arrive as [`ChatEvent`]s on one channel and are applied one at a time by
//! [`ChatController::dispatch`]. Nothing else mutates the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use hydro_core::config::HydroConfig;
use hydro_speech::{SpeechEvent, SpeechEventSink, SpeechInputAdapter};

use crate::error::ChatError;
use crate::reply::ReplyHandle;
use crate::store::{ConversationStore, PendingReply, ReplyOutcome};

/// User-interface actions other than typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    NewConversation,
    /// Load a sidebar entry by position (0 = most recent).
    LoadPosition(usize),
    LoadConversation(Uuid),
    ToggleVoice,
    Quit,
}

/// Everything the controller reacts to.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A line submitted from the input box.
    Typed(String),
    Command(UiCommand),
    /// The reply delay for a sent message elapsed.
    ReplyDue(PendingReply),
    Speech(SpeechEvent),
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ChatController {
    store: ConversationStore,
    replies: ReplyHandle,
    speech: Option<SpeechInputAdapter>,
    reply_delay: Duration,
    tx: UnboundedSender<ChatEvent>,
    rx: UnboundedReceiver<ChatEvent>,
}

impl std::fmt::Debug for ChatController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatController")
            .field("store", &self.store)
            .field("speech", &self.speech)
            .field("reply_delay", &self.reply_delay)
            .finish_non_exhaustive()
    }
}

impl ChatController {
    /// Build a controller from configuration, probing for speech input.
    pub fn new(config: &HydroConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            store: ConversationStore::new(&config.chat),
            replies: ReplyHandle::default(),
            speech: None,
            reply_delay: Duration::from_millis(config.chat.reply_delay_ms),
            tx,
            rx,
        };
        controller.speech = SpeechInputAdapter::probe(&config.speech, controller.speech_sink());
        controller
    }

    /// Use `replies` instead of the built-in keyword engine.
    pub fn with_reply_handle(mut self, replies: ReplyHandle) -> Self {
        self.replies = replies;
        self
    }

    /// Sink that forwards recognizer signals onto this controller's queue.
    pub fn speech_sink(&self) -> SpeechEventSink {
        let tx = self.tx.clone();
        Arc::new(move |event| {
            if tx.send(ChatEvent::Speech(event)).is_err() {
                tracing::debug!("Speech event dropped, chat loop closed");
            }
        })
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn replies(&self) -> &ReplyHandle {
        &self.replies
    }

    /// The speech adapter, if speech input is available at all.
    pub fn speech(&self) -> Option<&SpeechInputAdapter> {
        self.speech.as_ref()
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    /// Send `text` (or the pending input) and schedule its reply.
    ///
    /// Returns whether a message was actually sent. The reply timer runs on
    /// the current tokio runtime when there is one.
    pub fn send(&mut self, text: Option<&str>) -> bool {
        match self.store.send(text) {
            Some(ticket) => {
                self.schedule_reply(ticket);
                true
            }
            None => false,
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.store.set_pending_input(text);
    }

    /// Post `ReplyDue` after the reply delay.
    ///
    /// Outside a tokio runtime there is no timer, so the reply is queued
    /// straight away and lands on the next `step`.
    fn schedule_reply(&self, ticket: PendingReply) {
        let tx = self.tx.clone();
        let delay = self.reply_delay;
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("No tokio runtime, reply queued without delay");
            if tx.send(ChatEvent::ReplyDue(ticket)).is_err() {
                tracing::debug!("Chat loop closed before reply landed");
            }
            return;
        };
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(ChatEvent::ReplyDue(ticket)).is_err() {
                tracing::debug!("Chat loop closed before reply landed");
            }
        });
    }

    /// Wait for the next queued event.
    pub async fn next_event(&mut self) -> Option<ChatEvent> {
        self.rx.recv().await
    }

    /// Wait for the next event and apply it.
    pub async fn step(&mut self) -> Option<Result<Flow, ChatError>> {
        let event = self.next_event().await?;
        Some(self.dispatch(event))
    }

    /// Apply one event to the conversation.
    pub fn dispatch(&mut self, event: ChatEvent) -> Result<Flow, ChatError> {
        match event {
            ChatEvent::Typed(line) => {
                self.store.set_pending_input(line);
                self.send(None);
            }
            ChatEvent::ReplyDue(ticket) => {
                // Resolve the engine now, not when the message was sent.
                let reply = self.replies.reply_to(&ticket.utterance);
                match self.store.deliver_reply(&ticket, reply) {
                    ReplyOutcome::Delivered { history } => {
                        tracing::debug!(?history, "Reply delivered");
                    }
                    ReplyOutcome::Discarded => {}
                }
            }
            ChatEvent::Speech(SpeechEvent::Result(transcript)) => {
                let Some(adapter) = self.speech.as_mut() else {
                    tracing::debug!("Speech result without a speech adapter");
                    return Ok(Flow::Continue);
                };
                if let Some(text) = adapter.on_result(transcript) {
                    self.store.set_pending_input(text.clone());
                    self.send(Some(&text));
                }
            }
            ChatEvent::Speech(SpeechEvent::End) => {
                if let Some(adapter) = self.speech.as_mut() {
                    adapter.on_end();
                }
            }
            ChatEvent::Command(command) => return self.apply_command(command),
        }
        Ok(Flow::Continue)
    }

    fn apply_command(&mut self, command: UiCommand) -> Result<Flow, ChatError> {
        match command {
            UiCommand::NewConversation => self.store.start_new(),
            UiCommand::LoadPosition(position) => {
                self.store.load_position(position)?;
            }
            UiCommand::LoadConversation(id) => self.store.load_past(id)?,
            UiCommand::ToggleVoice => match self.speech.as_mut() {
                Some(adapter) => adapter.toggle(),
                None => tracing::debug!("Voice toggle ignored, no speech input"),
            },
            UiCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// Tests
// =============================================================================
