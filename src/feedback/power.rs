//! Host power management

use std::time::Duration;

use tracing::info;

use crate::config::PowerConfig;

use super::spawn_detached;

/// Shuts down or restarts the host
pub trait PowerControl: Send + Sync {
    fn shutdown(&self);
    fn restart(&self);
}

/// Runs the configured shutdown/reboot commands after a grace delay
#[derive(Debug, Clone)]
pub struct SystemPower {
    shutdown_command: Vec<String>,
    reboot_command: Vec<String>,
    grace: Duration,
}

impl SystemPower {
    pub fn new(config: &PowerConfig) -> Self {
        Self {
            shutdown_command: config.shutdown_command.clone(),
            reboot_command: config.reboot_command.clone(),
            grace: Duration::from_secs(config.grace_secs),
        }
    }

    fn run_later(&self, argv: Vec<String>) {
        let grace = self.grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            info!(command = ?argv, "running power command");
            spawn_detached(&argv, None);
        });
    }
}

impl PowerControl for SystemPower {
    fn shutdown(&self) {
        info!(grace_secs = self.grace.as_secs(), "shutdown requested");
        self.run_later(self.shutdown_command.clone());
    }

    fn restart(&self) {
        info!(grace_secs = self.grace.as_secs(), "reboot requested");
        self.run_later(self.reboot_command.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_runs_configured_command_after_grace() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("rebooted");

        let power = SystemPower::new(&PowerConfig {
            shutdown_command: vec!["false".to_string()],
            reboot_command: vec!["touch".to_string(), marker.display().to_string()],
            grace_secs: 0,
        });

        power.restart();
        for _ in 0..100 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert!(marker.exists());
    }
}
