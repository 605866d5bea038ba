use super::TriggerMode;
use crate::error::Result;
use crate::nodemap::{self, names, Access, NodeMap};
use tracing::info;

/// Return the device to free-running mode by switching `TriggerMode` Off
pub fn reset_trigger(node_map: &mut dyn NodeMap) -> Result<()> {
    nodemap::require_node(node_map, names::TRIGGER_MODE, Access::Read)?;
    nodemap::set_enum_entry(node_map, names::TRIGGER_MODE, TriggerMode::Off.entry())?;
    info!("Trigger mode disabled...");
    Ok(())
}
