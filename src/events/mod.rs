//! Status events emitted by the session
//!
//! Mirrors what a status light would show (ready, listening, thinking) plus
//! the outcome of each intercepted command.

use serde::{Deserialize, Serialize};

use crate::dispatch::Outcome;

/// Events broadcast by the session controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    /// Waiting for the hotword or a button press
    Ready,

    /// A turn is in progress and the user is speaking
    Listening,

    /// The user finished speaking
    Thinking,

    /// A keyword-prefixed command was handled locally
    CommandHandled { outcome: Outcome },

    /// Fatal assistant error; no further input is accepted
    Terminated,
}

impl std::fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusEvent::Ready => write!(f, "READY"),
            StatusEvent::Listening => write!(f, "LISTENING"),
            StatusEvent::Thinking => write!(f, "THINKING"),
            StatusEvent::CommandHandled { outcome } => write!(f, "COMMAND_HANDLED ({})", outcome),
            StatusEvent::Terminated => write!(f, "TERMINATED"),
        }
    }
}
