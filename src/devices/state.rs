//! HSB color state as exchanged with openHAB
//!
//! The wire form is `hue,saturation,brightness`, e.g. `260,100,45`. Fields
//! are kept as received so that an unchanged field is written back
//! byte-for-byte.

use std::fmt;
use std::str::FromStr;

/// Snapshot of a light's color item
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    hue: String,
    saturation: String,
    brightness: String,
}

/// Errors decoding a color state string
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateError {
    #[error("expected 3 comma-separated fields, got {0}")]
    FieldCount(usize),

    #[error("field {field} is not a number: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("field {field} is outside 0..={max}: {value}")]
    OutOfRange {
        field: &'static str,
        value: String,
        max: u16,
    },
}

impl DeviceState {
    /// Decode `hue,saturation,brightness`
    pub fn decode(raw: &str) -> Result<Self, StateError> {
        let parts: Vec<&str> = raw.trim().split(',').collect();
        let [hue, saturation, brightness] = parts.as_slice() else {
            return Err(StateError::FieldCount(parts.len()));
        };

        Ok(Self {
            hue: numeric("hue", hue, 360)?,
            saturation: numeric("saturation", saturation, 100)?,
            brightness: numeric("brightness", brightness, 100)?,
        })
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn brightness(&self) -> f64 {
        self.brightness.parse().unwrap_or_default()
    }

    /// Replace hue and saturation, keeping brightness as received
    pub fn with_color(&self, hue: u16, saturation: u8) -> Self {
        Self {
            hue: hue.to_string(),
            saturation: saturation.to_string(),
            brightness: self.brightness.clone(),
        }
    }

    /// Shift brightness by `delta` percent, clamped to 0..=100
    pub fn with_brightness_delta(&self, delta: i32) -> Self {
        let current = self.brightness().round().clamp(0.0, 100.0) as i32;
        let next = (current + delta).clamp(0, 100);
        Self {
            hue: self.hue.clone(),
            saturation: self.saturation.clone(),
            brightness: next.to_string(),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.saturation, self.brightness)
    }
}

impl FromStr for DeviceState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn numeric(field: &'static str, value: &str, max: u16) -> Result<String, StateError> {
    let value = value.trim();
    match value.parse::<f64>() {
        Ok(n) if (0.0..=f64::from(max)).contains(&n) => Ok(value.to_string()),
        Ok(n) if n.is_finite() => Err(StateError::OutOfRange {
            field,
            value: value.to_string(),
            max,
        }),
        _ => Err(StateError::NotNumeric {
            field,
            value: value.to_string(),
        }),
    }
}
