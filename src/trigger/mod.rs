//! Physical trigger input
//!
//! A button (or anything else) signals a press by writing a line to a named
//! pipe. A press is only forwarded to the session if the [`StartGate`] is
//! open when it happens.

mod gate;
mod listener;

pub use gate::{PressResult, StartGate};
pub use listener::{TriggerError, TriggerEvent, TriggerListener};
