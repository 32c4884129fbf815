//! Backend contract used by the dispatcher

use async_trait::async_trait;

/// HTTP status returned by the backend for a state push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushStatus(pub u16);

impl PushStatus {
    pub const ACCEPTED: PushStatus = PushStatus(200);
    pub const BAD_COMMAND: PushStatus = PushStatus(400);
    pub const UNKNOWN_ITEM: PushStatus = PushStatus(404);

    pub fn is_accepted(self) -> bool {
        self == Self::ACCEPTED
    }
}

/// Errors talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend not reachable at {url}: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("backend returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl BackendError {
    /// HTTP status behind the failure, if there was a response at all
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Reads and writes item state. Calls are attempted exactly once.
#[async_trait]
pub trait DeviceStateClient: Send + Sync {
    /// Current state of `item` as plain text
    async fn fetch(&self, item: &str) -> Result<String, BackendError>;

    /// Send a new state (plain text command) to `item`
    async fn push(&self, item: &str, value: &str) -> Result<PushStatus, BackendError>;
}
