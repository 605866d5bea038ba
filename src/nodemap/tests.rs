use super::*;
use crate::error::{DriverError, NodeError, TrigcamError};
use std::cell::Cell;
use std::collections::HashMap;

/// Node map that counts every driver-level call
struct CountingNodeMap {
    nodes: HashMap<String, (NodeInfo, Vec<EnumEntryInfo>, i64)>,
    reads: Cell<u32>,
    writes: u32,
    executes: u32,
}

impl CountingNodeMap {
    fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            reads: Cell::new(0),
            writes: 0,
            executes: 0,
        }
    }

    fn with_enum(mut self, name: &str, access: AccessMode, entries: &[(&str, i64)]) -> Self {
        let entries = entries
            .iter()
            .map(|(entry, value)| EnumEntryInfo::new(*entry, *value, AccessMode::ReadOnly))
            .collect();
        self.nodes.insert(
            name.to_string(),
            (NodeInfo::new(name, NodeKind::Enumeration, access), entries, 0),
        );
        self
    }

    fn with_command(mut self, name: &str, access: AccessMode) -> Self {
        self.nodes.insert(
            name.to_string(),
            (NodeInfo::new(name, NodeKind::Command, access), Vec::new(), 0),
        );
        self
    }
}

impl NodeMap for CountingNodeMap {
    fn node(&self, name: &str) -> Option<NodeInfo> {
        self.nodes.get(name).map(|(info, _, _)| info.clone())
    }

    fn enum_entries(&self, node: &str) -> Vec<EnumEntryInfo> {
        self.nodes
            .get(node)
            .map(|(_, entries, _)| entries.clone())
            .unwrap_or_default()
    }

    fn get_int_value(&self, node: &str) -> crate::error::DriverResult<i64> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.nodes.get(node).map(|(_, _, value)| *value).unwrap_or(0))
    }

    fn set_int_value(&mut self, node: &str, value: i64) -> crate::error::DriverResult<()> {
        self.writes += 1;
        if let Some(slot) = self.nodes.get_mut(node) {
            slot.2 = value;
        }
        Ok(())
    }

    fn get_string_value(&self, node: &str) -> crate::error::DriverResult<String> {
        self.reads.set(self.reads.get() + 1);
        Err(DriverError::TypeMismatch {
            node: node.to_string(),
            expected: "String".to_string(),
        })
    }

    fn execute(&mut self, _node: &str) -> crate::error::DriverResult<()> {
        self.executes += 1;
        Ok(())
    }
}

#[test]
fn test_access_mode_flags() {
    assert!(!AccessMode::NotImplemented.is_available());
    assert!(!AccessMode::NotAvailable.is_available());
    assert!(AccessMode::ReadOnly.is_readable());
    assert!(!AccessMode::ReadOnly.is_writable());
    assert!(AccessMode::WriteOnly.is_writable());
    assert!(!AccessMode::WriteOnly.is_readable());
    assert!(AccessMode::ReadWrite.is_readable() && AccessMode::ReadWrite.is_writable());
}

#[test]
fn test_set_enum_entry_writes_entry_value() {
    let mut map = CountingNodeMap::new().with_enum(
        names::TRIGGER_MODE,
        AccessMode::ReadWrite,
        &[("Off", 0), ("On", 1)],
    );

    let written = set_enum_entry(&mut map, names::TRIGGER_MODE, names::ON).unwrap();

    assert_eq!(written, 1);
    assert_eq!(map.writes, 1);
    assert_eq!(read_enum_entry(&map, names::TRIGGER_MODE).unwrap(), "On");
}

#[test]
fn test_unavailable_node_short_circuits_write() {
    let mut map = CountingNodeMap::new().with_enum(
        names::TRIGGER_MODE,
        AccessMode::NotAvailable,
        &[("Off", 0), ("On", 1)],
    );

    let result = set_enum_entry(&mut map, names::TRIGGER_MODE, names::OFF);

    assert!(matches!(
        result,
        Err(TrigcamError::Node(NodeError::NotAvailable { .. }))
    ));
    assert_eq!(map.writes, 0);
}

#[test]
fn test_unavailable_node_short_circuits_read() {
    let map = CountingNodeMap::new().with_enum(
        names::ACQUISITION_MODE,
        AccessMode::NotImplemented,
        &[("Continuous", 0)],
    );

    let result = read_enum_entry(&map, names::ACQUISITION_MODE);

    assert!(matches!(
        result,
        Err(TrigcamError::Node(NodeError::NotAvailable { .. }))
    ));
    assert_eq!(map.reads.get(), 0);
}

#[test]
fn test_read_only_node_rejects_write() {
    let mut map = CountingNodeMap::new().with_enum(
        names::TRIGGER_SOURCE,
        AccessMode::ReadOnly,
        &[("Software", 0), ("Line0", 1)],
    );

    let result = set_enum_entry(&mut map, names::TRIGGER_SOURCE, names::SOFTWARE);

    assert!(matches!(
        result,
        Err(TrigcamError::Node(NodeError::NotWritable { .. }))
    ));
    assert_eq!(map.writes, 0);
}

#[test]
fn test_missing_entry_is_reported() {
    let mut map = CountingNodeMap::new().with_enum(
        names::TRIGGER_SOURCE,
        AccessMode::ReadWrite,
        &[("Software", 0)],
    );

    let result = set_enum_entry(&mut map, names::TRIGGER_SOURCE, "Line3");

    match result {
        Err(TrigcamError::Node(NodeError::EntryNotFound { node, entry })) => {
            assert_eq!(node, names::TRIGGER_SOURCE);
            assert_eq!(entry, "Line3");
        }
        other => panic!("Expected missing entry error, got {:?}", other),
    }
    assert_eq!(map.writes, 0);
}

#[test]
fn test_missing_node_is_reported() {
    let map = CountingNodeMap::new();

    let result = require_node(&map, names::TRIGGER_MODE, Access::Read);

    assert!(matches!(
        result,
        Err(TrigcamError::Node(NodeError::NotFound { .. }))
    ));
}

#[test]
fn test_execute_command_requires_writable() {
    let mut map =
        CountingNodeMap::new().with_command(names::TRIGGER_SOFTWARE, AccessMode::ReadOnly);

    assert!(execute_command(&mut map, names::TRIGGER_SOFTWARE).is_err());
    assert_eq!(map.executes, 0);

    let mut map =
        CountingNodeMap::new().with_command(names::TRIGGER_SOFTWARE, AccessMode::WriteOnly);
    execute_command(&mut map, names::TRIGGER_SOFTWARE).unwrap();
    assert_eq!(map.executes, 1);
}

#[test]
fn test_read_string_surfaces_driver_error() {
    let map = CountingNodeMap::new().with_enum("DeviceModelName", AccessMode::ReadOnly, &[]);

    let result = read_string(&map, "DeviceModelName");

    assert!(matches!(
        result,
        Err(TrigcamError::Driver(DriverError::TypeMismatch { .. }))
    ));
    assert_eq!(map.reads.get(), 1);
}
