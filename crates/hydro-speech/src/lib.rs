//! HydroIntel speech crate - voice input for the chat.
//!
//! Wraps an optional speech recognition capability behind a small
//! toggle / result / end interface. When no recognizer is available the
//! adapter is simply absent and the chat runs text-only.

pub mod adapter;
pub mod recognizer;
pub mod state;

pub use adapter::SpeechInputAdapter;
pub use recognizer::{
    RecognizerSettings, ScriptedRecognizer, SpeechEvent, SpeechEventSink, SpeechRecognizer,
};
pub use state::ListeningState;
