//! Applies intents to the backend
//!
//! Absolute commands (on/off, color temperature) are a single push.
//! Color and brightness changes are read-modify-write on the HSB item so the
//! untouched components survive. Nothing is retried or rolled back: the push
//! response alone decides the outcome.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{DeviceStateClient, PushStatus};
use crate::devices::{Device, DeviceState};
use crate::feedback::PowerControl;
use crate::intent::{Action, Intent, Scope};

use super::outcome::Outcome;

/// Executes parsed intents. Holds no per-command state.
pub struct ActionExecutor {
    client: Arc<dyn DeviceStateClient>,
    power: Arc<dyn PowerControl>,
    all_lights_group: String,
}

impl ActionExecutor {
    pub fn new(
        client: Arc<dyn DeviceStateClient>,
        power: Arc<dyn PowerControl>,
        all_lights_group: impl Into<String>,
    ) -> Self {
        Self {
            client,
            power,
            all_lights_group: all_lights_group.into(),
        }
    }

    /// Execute an intent. `None` means the intent is deliberately ignored and
    /// nothing should be said.
    pub async fn execute(&self, intent: &Intent) -> Option<Outcome> {
        if intent.action == Action::Ignore {
            debug!(%intent, "ignoring intent");
            return None;
        }

        let outcome = match intent.scope {
            Some(Scope::AllLights) => self.execute_all_lights(intent.action).await,
            Some(Scope::SingleLight) => match &intent.target {
                Some(device) => self.execute_light(device, intent.action).await,
                None => Outcome::DeviceNotFound,
            },
            Some(Scope::System) => self.execute_system(intent.action),
            None => Outcome::ActionNotRecognized,
        };

        info!(%intent, %outcome, "intent executed");
        Some(outcome)
    }

    async fn execute_all_lights(&self, action: Action) -> Outcome {
        match action {
            Action::On => self.send(&self.all_lights_group, "ON").await,
            Action::Off => self.send(&self.all_lights_group, "OFF").await,
            _ => Outcome::ActionNotRecognized,
        }
    }

    async fn execute_light(&self, device: &Device, action: Action) -> Outcome {
        match action {
            Action::On => match color_item(device) {
                Some(item) => self.send(item, "ON").await,
                None => Outcome::ActionNotRecognized,
            },
            Action::Off => match color_item(device) {
                Some(item) => self.send(item, "OFF").await,
                None => Outcome::ActionNotRecognized,
            },
            Action::SetColor(color) => match color_item(device) {
                Some(item) => {
                    self.update_state(item, |s| s.with_color(color.hue(), color.saturation()))
                        .await
                }
                None => Outcome::ActionNotRecognized,
            },
            Action::AdjustBrightness(delta) => match color_item(device) {
                Some(item) => {
                    self.update_state(item, |s| s.with_brightness_delta(delta))
                        .await
                }
                None => Outcome::ActionNotRecognized,
            },
            Action::SetColorTemp(temp) => match device.color_temperature_item.as_deref() {
                Some(item) => self.send(item, &temp.level().to_string()).await,
                None => {
                    warn!(device = %device.name, "device has no color temperature item");
                    Outcome::ActionNotRecognized
                }
            },
            _ => Outcome::ActionNotRecognized,
        }
    }

    fn execute_system(&self, action: Action) -> Outcome {
        match action {
            Action::PowerOff => {
                self.power.shutdown();
                Outcome::PoweringOff
            }
            Action::Reboot => {
                self.power.restart();
                Outcome::Rebooting
            }
            _ => Outcome::ActionNotRecognized,
        }
    }

    /// Fetch the HSB state, transform it, and push the result
    async fn update_state<F>(&self, item: &str, change: F) -> Outcome
    where
        F: FnOnce(&DeviceState) -> DeviceState,
    {
        let raw = match self.client.fetch(item).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(item, error = %e, "failed to fetch state");
                return Outcome::RemoteError { status: e.status() };
            }
        };

        let current = match DeviceState::decode(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!(item, %raw, error = %e, "unexpected state format");
                return Outcome::RemoteError { status: None };
            }
        };

        let next = change(&current);
        debug!(item, from = %current, to = %next, "state change");
        self.send(item, &next.encode()).await
    }

    async fn send(&self, item: &str, value: &str) -> Outcome {
        match self.client.push(item, value).await {
            Ok(status) => {
                if status != PushStatus::ACCEPTED {
                    warn!(item, value, status = status.0, "command rejected");
                }
                Outcome::from_push(status)
            }
            Err(e) => {
                warn!(item, value, error = %e, "failed to send command");
                Outcome::RemoteError { status: e.status() }
            }
        }
    }
}

fn color_item(device: &Device) -> Option<&str> {
    let item = device.color_item.as_deref();
    if item.is_none() {
        warn!(device = %device.name, "device has no color item");
    }
    item
}
