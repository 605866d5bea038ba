use crate::acquisition::AcquisitionReport;
use crate::display::DisplayStats;
use crate::error::Result;
use crate::trigger::TriggerSource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Uninitialized,
    Initialized,
    TriggerConfigured,
    Acquiring,
    TriggerReset,
    Deinitialized,
    Failed,
}

/// Everything a finished session reports back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub session_id: String,
    pub trigger_source: TriggerSource,
    pub cameras: Vec<String>,
    pub success: bool,
    pub report: Option<AcquisitionReport>,
    pub display: Option<DisplayStats>,
    pub states: Vec<SessionState>,
    pub errors: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl SessionOutcome {
    pub fn new(session_id: String, trigger_source: TriggerSource, cameras: Vec<String>) -> Self {
        Self {
            session_id,
            trigger_source,
            cameras,
            success: true,
            report: None,
            display: None,
            states: Vec::new(),
            errors: Vec::new(),
            completed_at: Utc::now(),
        }
    }

    pub fn record_failure(&mut self, error: &impl std::fmt::Display) {
        self.success = false;
        self.errors.push(error.to_string());
    }

    /// Process exit code: 0 on success, -1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            -1
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!("Session report written to {}", path.display());
        Ok(())
    }
}
