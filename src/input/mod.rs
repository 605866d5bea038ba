//! Operator interaction: trigger confirmation and the stop key.

mod console;
mod scripted;

pub use console::ConsoleInput;
pub use scripted::ScriptedInput;

use crate::error::Result;
use std::time::Duration;

/// Source of operator decisions during acquisition
pub trait OperatorInput {
    /// Show `prompt` and block until the operator confirms
    fn wait_for_confirmation(&mut self, prompt: &str) -> Result<()>;

    /// Show a message that needs no answer
    fn notify(&mut self, message: &str) -> Result<()>;

    /// Wait up to `wait` for the stop key.
    ///
    /// Once a stop has been observed every later call reports it again.
    fn poll_stop(&mut self, wait: Duration) -> Result<bool>;
}
