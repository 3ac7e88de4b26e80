//! Listening state machine for voice input.
//!
//! Valid transitions:
//! - Idle -> Listening (recognition started)
//! - Listening -> Idle (recognizer reported end)
//!
//! A stop request does not transition by itself; the recognizer's end
//! signal does. `reset` forces Idle from any state.

use std::fmt;

use hydro_core::error::HydroError;

/// Operational state of the speech input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListeningState {
    /// Not capturing speech.
    Idle,
    /// Recognizer is running.
    Listening,
}

impl fmt::Display for ListeningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListeningState::Idle => write!(f, "Idle"),
            ListeningState::Listening => write!(f, "Listening"),
        }
    }
}

impl ListeningState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &ListeningState) -> bool {
        matches!(
            (self, target),
            (ListeningState::Idle, ListeningState::Listening)
                | (ListeningState::Listening, ListeningState::Idle)
        )
    }
}

/// Validating wrapper around [`ListeningState`].
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: ListeningState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: ListeningState::Idle,
        }
    }

    pub fn current(&self) -> ListeningState {
        self.state
    }

    /// Attempt to transition to the target state.
    ///
    /// Returns `HydroError::Speech` if the transition is not allowed from the
    /// current state.
    pub fn transition(&mut self, target: ListeningState) -> Result<(), HydroError> {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Listening state: {} -> {}", self.state, target);
            self.state = target;
            Ok(())
        } else {
            Err(HydroError::Speech(format!(
                "Invalid state transition: {} -> {}",
                self.state, target
            )))
        }
    }

    /// Force the state machine back to Idle.
    pub fn reset(&mut self) {
        if self.state != ListeningState::Idle {
            tracing::debug!("Listening state reset to Idle from {}", self.state);
        }
        self.state = ListeningState::Idle;
    }
}
