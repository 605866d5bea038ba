mod devices;
mod orchestrator;
mod state;
#[cfg(test)]
mod tests;
mod types;

pub use orchestrator::SessionOrchestrator;
pub use types::{SessionOutcome, SessionState};
