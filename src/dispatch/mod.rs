//! Intent execution
//!
//! Turns a parsed intent into backend calls and a user-facing outcome.
//! Every failure ends here as an `Outcome`; nothing is raised further.

mod executor;
mod outcome;

pub use executor::ActionExecutor;
pub use outcome::Outcome;
