//! Spoken feedback

use tracing::info;

use super::spawn_detached;

/// Speaks a short message to the user
pub trait Announcer: Send + Sync {
    fn announce(&self, message: &str);
}

/// Runs an external text-to-speech program, message as the last argument
#[derive(Debug, Clone)]
pub struct CommandAnnouncer {
    argv: Vec<String>,
}

impl CommandAnnouncer {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl Announcer for CommandAnnouncer {
    fn announce(&self, message: &str) {
        info!(message, "announce");
        spawn_detached(&self.argv, Some(message));
    }
}

/// Used when no speech program is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&self, message: &str) {
        info!(message, "announce (no speech command configured)");
    }
}
