//! Static mapping from spoken light names to openHAB items

use crate::config::DeviceConfig;

/// A light that can be addressed by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Lowercase name as it appears in commands, e.g. "office"
    pub name: String,
    /// HSB color item (also accepts ON/OFF)
    pub color_item: Option<String>,
    /// Color temperature item (0 = cool, 100 = warm)
    pub color_temperature_item: Option<String>,
}

/// Ordered device table, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// Build the registry from configured devices, keeping declaration order
    pub fn from_config(devices: &[DeviceConfig]) -> Self {
        Self::new(
            devices
                .iter()
                .map(|d| Device {
                    name: d.name.clone(),
                    color_item: d.color_item.clone(),
                    color_temperature_item: d.color_temperature_item.clone(),
                })
                .collect(),
        )
    }

    /// First declared device whose name occurs anywhere in `text`.
    ///
    /// This is a plain substring scan: with devices "lamp" and "desk lamp",
    /// "the desk lamp" resolves to "lamp" if it was declared first.
    pub fn find_in(&self, text: &str) -> Option<&Device> {
        self.devices.iter().find(|d| text.contains(d.name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
