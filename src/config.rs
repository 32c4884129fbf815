//! Configuration loading and management
//!
//! The daemon reads a single TOML file at startup. A missing file is not an
//! error: the defaults describe a one-bulb openHAB install on localhost.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "OPENHAB_VOICE_CONFIG";

/// Daemon configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First word that opts an utterance into local dispatch
    pub activation_keyword: String,

    /// Echo every REST request and error body
    pub debug: bool,

    /// openHAB group item switched by "all lights" commands
    pub all_lights_group: String,

    pub backend: BackendConfig,

    /// Known lights, matched against utterances in this order
    pub devices: Vec<DeviceConfig>,

    pub voice: VoiceConfig,

    pub power: PowerConfig,

    pub trigger: TriggerConfig,
}

/// Location of the openHAB REST API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

/// One light and the items that control it
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    #[serde(default)]
    pub color_item: Option<String>,
    #[serde(default)]
    pub color_temperature_item: Option<String>,
}

/// Text-to-speech program used for spoken feedback
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// argv of the speech program; the message is appended as the last argument
    pub command: Option<Vec<String>>,
}

/// Host power management commands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub shutdown_command: Vec<String>,
    pub reboot_command: Vec<String>,
    /// Delay before running a power command, so the farewell can be spoken
    pub grace_secs: u64,
}

/// Physical trigger input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Named pipe; every line written to it counts as one button press
    pub fifo_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            activation_keyword: "home".to_string(),
            debug: true,
            all_lights_group: "Lights_ALL".to_string(),
            backend: BackendConfig::default(),
            devices: vec![DeviceConfig {
                name: "office".to_string(),
                color_item: Some("hue_0210_00178828e0d0_1_color".to_string()),
                color_temperature_item: Some(
                    "hue_0210_00178828e0d0_1_color_temperature".to_string(),
                ),
            }],
            voice: VoiceConfig::default(),
            power: PowerConfig::default(),
            trigger: TriggerConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            timeout_secs: 5,
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            shutdown_command: vec!["sudo".into(), "shutdown".into(), "now".into()],
            reboot_command: vec!["sudo".into(), "reboot".into()],
            grace_secs: 3,
        }
    }
}

impl BackendConfig {
    /// Base URL of the items endpoint, e.g. `http://localhost:8080/rest/items`
    pub fn items_url(&self) -> String {
        format!("http://{}:{}/rest/items", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Path of the config file: `$OPENHAB_VOICE_CONFIG`, else under `$HOME/.config`
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = std::env::var("HOME").context("HOME is not set")?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("openhab-voice")
            .join("config.toml"))
    }

    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.activation_keyword = config.activation_keyword.trim().to_lowercase();
        for device in &mut config.devices {
            device.name = device.name.trim().to_lowercase();
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.activation_keyword.is_empty() {
            bail!("activation_keyword must not be empty");
        }
        if self.activation_keyword.split_whitespace().count() != 1 {
            bail!("activation_keyword must be a single word");
        }
        if self.backend.port == 0 {
            bail!("backend.port must not be zero");
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.name.is_empty() {
                bail!("device names must not be empty");
            }
            if !seen.insert(device.name.as_str()) {
                bail!("duplicate device name {:?}", device.name);
            }
        }

        Ok(())
    }
}
