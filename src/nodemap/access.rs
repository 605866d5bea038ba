use super::node::{Access, EnumEntryInfo, NodeInfo};
use super::NodeMap;
use crate::error::{DriverError, NodeError, Result};
use tracing::{debug, trace};

/// Fetch a node's description and verify it grants `access`
pub fn require_node(map: &dyn NodeMap, name: &str, access: Access) -> Result<NodeInfo> {
    let info = map.node(name).ok_or_else(|| NodeError::NotFound {
        node: name.to_string(),
    })?;

    if !info.access.is_available() {
        return Err(NodeError::NotAvailable {
            node: name.to_string(),
        }
        .into());
    }

    let readable_needed = matches!(access, Access::Read | Access::ReadWrite);
    if readable_needed && !info.access.is_readable() {
        return Err(NodeError::NotReadable {
            node: name.to_string(),
        }
        .into());
    }

    let writable_needed = matches!(access, Access::Write | Access::ReadWrite);
    if writable_needed && !info.access.is_writable() {
        return Err(NodeError::NotWritable {
            node: name.to_string(),
        }
        .into());
    }

    trace!("Node '{}' grants {:?} ({:?})", name, access, info.access);
    Ok(info)
}

/// Fetch an enumeration entry and verify it is available and readable
pub fn require_entry(map: &dyn NodeMap, node: &str, entry: &str) -> Result<EnumEntryInfo> {
    let info = map
        .enum_entry(node, entry)
        .ok_or_else(|| NodeError::EntryNotFound {
            node: node.to_string(),
            entry: entry.to_string(),
        })?;

    if !info.access.is_available() {
        return Err(NodeError::EntryNotAvailable {
            node: node.to_string(),
            entry: entry.to_string(),
        }
        .into());
    }

    if !info.access.is_readable() {
        return Err(NodeError::EntryNotReadable {
            node: node.to_string(),
            entry: entry.to_string(),
        }
        .into());
    }

    Ok(info)
}

/// Select `entry` on enumeration node `node`.
///
/// Both the node (writable) and the entry (readable) are checked before the
/// value is written. Returns the integer value that was written.
pub fn set_enum_entry(map: &mut dyn NodeMap, node: &str, entry: &str) -> Result<i64> {
    require_node(map, node, Access::Write)?;
    let entry_info = require_entry(map, node, entry)?;

    map.set_int_value(node, entry_info.value)?;
    debug!("Set {} to {} ({})", node, entry, entry_info.value);

    Ok(entry_info.value)
}

/// Read the symbolic name of the current entry of an enumeration node
pub fn read_enum_entry(map: &dyn NodeMap, node: &str) -> Result<String> {
    require_node(map, node, Access::Read)?;
    let value = map.get_int_value(node)?;

    map.enum_entries(node)
        .into_iter()
        .find(|entry| entry.value == value)
        .map(|entry| entry.name)
        .ok_or_else(|| {
            DriverError::ValueOutOfRange {
                node: node.to_string(),
                value,
            }
            .into()
        })
}

pub fn read_string(map: &dyn NodeMap, node: &str) -> Result<String> {
    require_node(map, node, Access::Read)?;
    Ok(map.get_string_value(node)?)
}

/// Execute a command node once it is confirmed available and writable
pub fn execute_command(map: &mut dyn NodeMap, node: &str) -> Result<()> {
    require_node(map, node, Access::Write)?;
    map.execute(node)?;
    debug!("Executed command {}", node);
    Ok(())
}
