//! Per-device configuration namespace.
//!
//! Cameras expose their settings as named nodes with GenICam-style access
//! flags. The driver implements [`NodeMap`]; the rest of the crate only
//! touches nodes through the checked helpers in this module, which verify
//! availability, readability and writability before the driver is called.

mod access;
mod node;
#[cfg(test)]
mod tests;

pub use access::{
    execute_command, read_enum_entry, read_string, require_entry, require_node, set_enum_entry,
};
pub use node::{Access, AccessMode, EnumEntryInfo, NodeInfo, NodeKind};

use crate::error::DriverResult;

/// Well-known node and entry names
pub mod names {
    pub const TRIGGER_MODE: &str = "TriggerMode";
    pub const TRIGGER_SOURCE: &str = "TriggerSource";
    pub const TRIGGER_SOFTWARE: &str = "TriggerSoftware";
    pub const ACQUISITION_MODE: &str = "AcquisitionMode";
    pub const PIXEL_FORMAT: &str = "PixelFormat";
    pub const WIDTH: &str = "Width";
    pub const HEIGHT: &str = "Height";
    pub const DEVICE_SERIAL_NUMBER: &str = "DeviceSerialNumber";
    pub const DEVICE_MODEL_NAME: &str = "DeviceModelName";
    pub const DEVICE_VENDOR_NAME: &str = "DeviceVendorName";

    pub const OFF: &str = "Off";
    pub const ON: &str = "On";
    pub const SOFTWARE: &str = "Software";
    pub const CONTINUOUS: &str = "Continuous";
}

/// Driver side of a device's node map.
///
/// Drivers may refuse a call on their own, but callers never rely on that:
/// they go through [`require_node`] and friends first.
pub trait NodeMap {
    /// Describe a node, or `None` when the device has no node by that name
    fn node(&self, name: &str) -> Option<NodeInfo>;

    /// All entries of an enumeration node (empty for other node kinds)
    fn enum_entries(&self, node: &str) -> Vec<EnumEntryInfo>;

    fn get_int_value(&self, node: &str) -> DriverResult<i64>;

    fn set_int_value(&mut self, node: &str, value: i64) -> DriverResult<()>;

    fn get_string_value(&self, node: &str) -> DriverResult<String>;

    fn execute(&mut self, node: &str) -> DriverResult<()>;

    /// Look up one entry of an enumeration node
    fn enum_entry(&self, node: &str, entry: &str) -> Option<EnumEntryInfo> {
        self.enum_entries(node)
            .into_iter()
            .find(|candidate| candidate.name == entry)
    }
}
