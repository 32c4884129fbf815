//! Device table and color state
//!
//! Lights are addressed through openHAB items: one HSB color item and,
//! optionally, one color temperature item per light.

mod registry;
mod state;

pub use registry::{Device, DeviceRegistry};
pub use state::{DeviceState, StateError};
