//! Command outcomes and their spoken phrases

use serde::{Deserialize, Serialize};

use crate::backend::PushStatus;

/// Result of handling one command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    DeviceNotFound,
    ActionNotRecognized,
    /// Backend refused or could not be reached; `status` is absent when
    /// there was no HTTP response
    RemoteError { status: Option<u16> },
    PoweringOff,
    Rebooting,
}

impl Outcome {
    /// Map a push response to an outcome
    pub fn from_push(status: PushStatus) -> Self {
        if status.is_accepted() {
            Outcome::Success
        } else {
            Outcome::RemoteError {
                status: Some(status.0),
            }
        }
    }

    /// What gets said to the user
    pub fn phrase(&self) -> &'static str {
        match self {
            Outcome::Success => "OK",
            Outcome::DeviceNotFound => "Sorry, I don't know that device",
            Outcome::ActionNotRecognized => "Sorry, I cannot do that yet",
            Outcome::RemoteError { status: Some(s) } if *s == PushStatus::BAD_COMMAND.0 => {
                "There has been an error: bad command"
            }
            Outcome::RemoteError { status: Some(s) } if *s == PushStatus::UNKNOWN_ITEM.0 => {
                "There has been an error: unknown item"
            }
            Outcome::RemoteError { .. } => "Command failed",
            Outcome::PoweringOff => "Powering off the system. Good bye!",
            Outcome::Rebooting => "Rebooting the system. Hold on!",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::DeviceNotFound => write!(f, "DEVICE_NOT_FOUND"),
            Outcome::ActionNotRecognized => write!(f, "ACTION_NOT_RECOGNIZED"),
            Outcome::RemoteError { status: Some(code) } => write!(f, "REMOTE_ERROR ({})", code),
            Outcome::RemoteError { status: None } => write!(f, "REMOTE_ERROR (no response)"),
            Outcome::PoweringOff => write!(f, "POWERING_OFF"),
            Outcome::Rebooting => write!(f, "REBOOTING"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_status_mapping() {
        assert_eq!(Outcome::from_push(PushStatus::ACCEPTED), Outcome::Success);
        assert_eq!(
            Outcome::from_push(PushStatus::UNKNOWN_ITEM),
            Outcome::RemoteError { status: Some(404) }
        );
    }

    #[test]
    fn test_remote_error_phrases_are_distinct() {
        let bad = Outcome::RemoteError { status: Some(400) }.phrase();
        let unknown = Outcome::RemoteError { status: Some(404) }.phrase();
        let other = Outcome::RemoteError { status: Some(500) }.phrase();
        assert_ne!(bad, unknown);
        assert_ne!(unknown, other);
        assert_eq!(other, Outcome::RemoteError { status: None }.phrase());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&Outcome::RemoteError { status: Some(400) }).unwrap();
        assert!(json.contains("remote_error"));
        assert!(json.contains("400"));
    }
}
