//! openHAB REST backend
//!
//! The dispatcher only needs two calls: read an item's state and post a new
//! one. `DeviceStateClient` is the seam; `OpenHabClient` is the HTTP
//! implementation.

mod client;
mod openhab;

pub use client::{BackendError, DeviceStateClient, PushStatus};
pub use openhab::OpenHabClient;
