//! Typed command surface consumed from the script runtime.

pub mod dispatcher;
pub mod types;

pub use dispatcher::CommandDispatcher;
pub use types::{Command, CommandResponse, ItemFailure};
