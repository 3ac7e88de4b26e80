//! Speech input adapter: start/stop toggle plus transcript and end handling.
//!
//! The adapter mirrors the recognizer's lifecycle. Stopping is a request: the
//! adapter stays `Listening` until the recognizer reports `End`, so for a short
//! window the requested and actual states disagree.

use hydro_core::config::SpeechConfig;

use crate::recognizer::{ScriptedRecognizer, SpeechEventSink, SpeechRecognizer};
use crate::state::{ListeningState, StateMachine};

pub struct SpeechInputAdapter {
    recognizer: Box<dyn SpeechRecognizer>,
    state_machine: StateMachine,
    stop_requested: bool,
}

impl std::fmt::Debug for SpeechInputAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechInputAdapter")
            .field("state_machine", &self.state_machine)
            .field("stop_requested", &self.stop_requested)
            .finish()
    }
}

impl SpeechInputAdapter {
    /// Wrap an existing recognizer.
    pub fn with_recognizer(recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            state_machine: StateMachine::new(),
            stop_requested: false,
        }
    }

    /// Detect whether speech input is available.
    ///
    /// Returns `None` when the capability is missing; callers then render no
    /// voice control and keep no listening state.
    pub fn probe(config: &SpeechConfig, sink: SpeechEventSink) -> Option<Self> {
        if !config.enabled {
            tracing::info!("Speech input disabled in config");
            return None;
        }
        if config.transcripts.is_empty() {
            tracing::info!("No speech recognizer available, running text-only");
            return None;
        }
        let recognizer = ScriptedRecognizer::from_config(config, sink);
        tracing::info!(
            language = %config.language,
            transcripts = recognizer.remaining(),
            "Speech input available"
        );
        Some(Self::with_recognizer(Box::new(recognizer)))
    }

    pub fn state(&self) -> ListeningState {
        self.state_machine.current()
    }

    pub fn is_listening(&self) -> bool {
        self.state() == ListeningState::Listening
    }

    /// Whether a stop was requested and the recognizer has not ended yet.
    pub fn stop_pending(&self) -> bool {
        self.stop_requested
    }

    /// Start listening when idle, request a stop when listening.
    ///
    /// Recognizer failures are logged and leave the adapter where it was.
    pub fn toggle(&mut self) {
        match self.state() {
            ListeningState::Idle => {
                if let Err(e) = self.recognizer.start() {
                    tracing::warn!(error = %e, "Failed to start speech recognition");
                    return;
                }
                if let Err(e) = self.state_machine.transition(ListeningState::Listening) {
                    tracing::warn!(error = %e, "Speech state out of sync");
                }
            }
            ListeningState::Listening if self.stop_requested => {
                tracing::debug!("Stop already requested, waiting for recognizer to end");
            }
            ListeningState::Listening => {
                self.stop_requested = true;
                if let Err(e) = self.recognizer.stop() {
                    // Usually the session already finished and its End is queued.
                    tracing::debug!(error = %e, "Speech recognition stop request failed");
                }
            }
        }
    }

    /// Accept a recognized transcript.
    ///
    /// Returns the text the chat should send, or `None` when the transcript is
    /// blank.
    pub fn on_result(&mut self, transcript: String) -> Option<String> {
        if transcript.trim().is_empty() {
            tracing::debug!("Ignoring blank transcript");
            return None;
        }
        tracing::info!(text_len = transcript.len(), "Speech transcript received");
        Some(transcript)
    }

    /// Recognizer ended: return to Idle no matter how it got here.
    pub fn on_end(&mut self) {
        self.stop_requested = false;
        self.state_machine.reset();
    }
}

// =============================================================================
// Tests
// =============================================================================
