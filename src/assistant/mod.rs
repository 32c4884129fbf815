//! Speech assistant bridge
//!
//! The speech engine (hotword, recognition, its own answers) runs in a
//! separate process. It reports lifecycle events to the daemon and accepts
//! start/stop commands, both as newline-delimited JSON.

mod bridge;
mod protocol;

pub use bridge::{spawn_event_reader, AssistantHandle, CommandWriter};
pub use protocol::{AssistantCommand, AssistantEvent};
