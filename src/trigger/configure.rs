use super::{TriggerMode, TriggerSource};
use crate::error::Result;
use crate::nodemap::{self, names, Access, NodeMap};
use tracing::info;

/// Arm the trigger on `node_map`.
///
/// The mode is switched Off before the source changes, because sources can
/// only be selected while triggering is disabled. Each step verifies node and
/// entry access first; the first failure aborts and later steps are never
/// issued. Nothing is rolled back on failure.
pub fn configure_trigger(
    node_map: &mut dyn NodeMap,
    source: TriggerSource,
    hardware_line: &str,
) -> Result<()> {
    info!("*** CONFIGURING TRIGGER ***");
    match source {
        TriggerSource::Software => info!("Software trigger chosen..."),
        TriggerSource::Hardware => info!("Hardware trigger chosen ({})...", hardware_line),
    }

    nodemap::require_node(node_map, names::TRIGGER_MODE, Access::Read)?;
    nodemap::set_enum_entry(node_map, names::TRIGGER_MODE, TriggerMode::Off.entry())?;
    info!("Trigger mode disabled...");

    let entry = source.source_entry(hardware_line);
    nodemap::set_enum_entry(node_map, names::TRIGGER_SOURCE, entry)?;
    match source {
        TriggerSource::Software => info!("Trigger source set to software..."),
        TriggerSource::Hardware => info!("Trigger source set to hardware ({})...", entry),
    }

    nodemap::set_enum_entry(node_map, names::TRIGGER_MODE, TriggerMode::On.entry())?;
    info!("Trigger mode turned back on...");

    Ok(())
}
