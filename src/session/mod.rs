//! Conversation session management
//!
//! Tracks the assistant's turn lifecycle with an explicit state machine:
//! - Idle: assistant not ready yet, trigger disabled
//! - ReadyIdle: waiting for the hotword or a button press
//! - Listening: a turn is active and the user is speaking
//! - Thinking: the user finished; recognized text is handled here
//! - Terminated: fatal assistant error, no further input

mod gate;
mod machine;

pub use gate::strip_activation_keyword;
pub use machine::{SessionController, SessionError, SessionState};
