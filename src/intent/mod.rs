//! Intent recognition
//!
//! Maps lowercase command text to a closed set of light and system actions
//! using ordered keyword checks. Keywords are matched with surrounding
//! spaces (" on ", not "on") so that "turn on" never matches "front".

mod parser;
mod types;

pub use parser::IntentParser;
pub use types::{Action, Color, ColorTemp, Intent, Scope};
