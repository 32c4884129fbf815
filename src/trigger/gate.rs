//! Shared "may a conversation start" flag
//!
//! The session opens and closes the gate as turns begin and end. The trigger
//! side reads it at the moment of the press, so a press made during a turn is
//! dropped even if the session only gets to it after the turn is over.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::listener::TriggerEvent;

#[derive(Debug, Clone, Default)]
pub struct StartGate {
    open: Arc<AtomicBool>,
}

/// What became of a press offered through the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressResult {
    Forwarded,
    /// A turn is active or one was already requested
    Closed,
    /// Session queue is full
    Dropped,
    /// Session has stopped
    Disconnected,
}

impl StartGate {
    /// Closed until the session opens it
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// Record a press, forwarding it only if a conversation may start now.
    /// Never blocks, so it can be called from the listener thread.
    pub fn press(&self, tx: &mpsc::Sender<TriggerEvent>) -> PressResult {
        if !self.is_open() {
            debug!("trigger pressed while gate closed, ignoring");
            return PressResult::Closed;
        }

        match tx.try_send(TriggerEvent::Pressed) {
            Ok(()) => PressResult::Forwarded,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("trigger queue full, dropping press");
                PressResult::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => PressResult::Disconnected,
        }
    }
}
