//! Trigger control for GenICam-style cameras.
//!
//! The trigger is armed once before acquisition (disable, select the source,
//! enable), invoked once per frame, and disarmed after acquisition.

mod configure;
mod invoke;
mod reset;

pub use configure::configure_trigger;
pub use invoke::{grab_next_image_by_trigger, HARDWARE_TRIGGER_NOTICE, SOFTWARE_TRIGGER_PROMPT};
pub use reset::reset_trigger;

use crate::nodemap::names;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where trigger pulses come from for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
    /// `TriggerSoftware` command issued after operator confirmation
    Software,
    /// External signal on a trigger input line
    Hardware,
}

impl TriggerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::Software => "software",
            TriggerSource::Hardware => "hardware",
        }
    }

    /// `TriggerSource` enumeration entry to select for this source
    pub fn source_entry<'a>(&self, hardware_line: &'a str) -> &'a str {
        match self {
            TriggerSource::Software => names::SOFTWARE,
            TriggerSource::Hardware => hardware_line,
        }
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TriggerSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "software" => Ok(TriggerSource::Software),
            "hardware" => Ok(TriggerSource::Hardware),
            other => Err(format!("unknown trigger source '{}'", other)),
        }
    }
}

/// State of the `TriggerMode` node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    Off,
    On,
}

impl TriggerMode {
    /// Enumeration entry name on the device
    pub fn entry(&self) -> &'static str {
        match self {
            TriggerMode::Off => names::OFF,
            TriggerMode::On => names::ON,
        }
    }
}
