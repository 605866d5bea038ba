use super::OperatorInput;
use crate::error::{Result, TrigcamError};
use std::time::Duration;
use tracing::debug;

/// Operator that confirms every trigger and stops after a fixed number of
/// stop-key polls. Used for unattended runs and in tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    stop_after_polls: Option<usize>,
    confirmation_limit: Option<usize>,
    polls: usize,
    prompts: Vec<String>,
    notices: Vec<String>,
}

impl ScriptedInput {
    /// Never requests a stop
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the stop key on the `polls`-th poll and every poll after it
    pub fn stop_after_polls(polls: usize) -> Self {
        Self {
            stop_after_polls: Some(polls),
            ..Self::default()
        }
    }

    /// Stop once `cycles` full passes over `cameras` devices were polled
    pub fn stop_after_cycles(cycles: usize, cameras: usize) -> Self {
        Self::stop_after_polls(cycles.max(1) * cameras.max(1))
    }

    /// Fail confirmations after `limit` successful ones
    pub fn with_confirmation_limit(mut self, limit: usize) -> Self {
        self.confirmation_limit = Some(limit);
        self
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Messages shown without waiting, in order
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn confirmations(&self) -> usize {
        self.prompts.len()
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl OperatorInput for ScriptedInput {
    fn wait_for_confirmation(&mut self, prompt: &str) -> Result<()> {
        if let Some(limit) = self.confirmation_limit {
            if self.prompts.len() >= limit {
                return Err(TrigcamError::input("Scripted confirmations exhausted"));
            }
        }

        debug!("Scripted confirmation for: {}", prompt);
        self.prompts.push(prompt.to_string());
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        debug!("Scripted notice: {}", message);
        self.notices.push(message.to_string());
        Ok(())
    }

    fn poll_stop(&mut self, _wait: Duration) -> Result<bool> {
        self.polls += 1;
        Ok(self.stop_after_polls.is_some_and(|limit| self.polls >= limit))
    }
}
