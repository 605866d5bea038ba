use crate::trigger::TriggerSource;
use serde::Serialize;

/// Counters for one camera over an acquisition run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceStats {
    pub index: usize,
    pub serial: String,
    pub frames_retrieved: u64,
    pub frames_released: u64,
    pub frames_incomplete: u64,
    pub frames_displayed: u64,
    pub errors: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl DeviceStats {
    pub fn new(index: usize, serial: &str) -> Self {
        Self {
            index,
            serial: serial.to_string(),
            ..Self::default()
        }
    }

    pub fn record_error(&mut self, error: &impl std::fmt::Display) {
        self.errors += 1;
        self.last_error = Some(error.to_string());
    }
}

/// Outcome of [`super::AcquisitionLoop::run`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionReport {
    pub trigger_source: TriggerSource,
    /// Completed passes over every camera
    pub cycles: u64,
    pub stopped_by_operator: bool,
    pub devices: Vec<DeviceStats>,
    /// False when any camera failed at any point
    pub success: bool,
}

impl AcquisitionReport {
    pub fn new(trigger_source: TriggerSource) -> Self {
        Self {
            trigger_source,
            cycles: 0,
            stopped_by_operator: false,
            devices: Vec::new(),
            success: true,
        }
    }

    pub fn total_retrieved(&self) -> u64 {
        self.devices.iter().map(|d| d.frames_retrieved).sum()
    }

    pub fn total_released(&self) -> u64 {
        self.devices.iter().map(|d| d.frames_released).sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.devices.iter().map(|d| d.errors).sum()
    }
}
