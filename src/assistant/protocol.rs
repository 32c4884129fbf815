//! Assistant bridge message definitions
//!
//! One JSON object per line, tagged by `type`.

use serde::{Deserialize, Serialize};

/// Lifecycle events delivered by the speech assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantEvent {
    /// Assistant finished starting up and can take conversations
    Ready,

    /// A conversation turn began (hotword or explicit start)
    TurnStarted,

    /// The user stopped talking
    EndOfUtterance,

    /// Final transcript of what the user said
    RecognizedText { text: String },

    /// The turn is over, including the assistant's own answer
    TurnFinished,

    /// Assistant failure; fatal errors end the daemon
    Error {
        #[serde(default)]
        is_fatal: bool,
    },
}

/// Commands sent to the speech assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantCommand {
    /// Begin listening as if the hotword had been heard
    StartConversation,

    /// Abandon the current turn without the assistant answering
    StopConversation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialization() {
        let event: AssistantEvent =
            serde_json::from_str(r#"{"type":"recognized_text","text":"Home turn on"}"#).unwrap();
        assert_eq!(
            event,
            AssistantEvent::RecognizedText {
                text: "Home turn on".to_string()
            }
        );

        let event: AssistantEvent = serde_json::from_str(r#"{"type":"error"}"#).unwrap();
        assert_eq!(event, AssistantEvent::Error { is_fatal: false });
    }

    #[test]
    fn test_command_serialization() {
        let json = serde_json::to_string(&AssistantCommand::StopConversation).unwrap();
        assert_eq!(json, r#"{"type":"stop_conversation"}"#);
    }
}
