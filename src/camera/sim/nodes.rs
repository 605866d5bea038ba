use super::journal::{DriverEvent, DriverJournal};
use crate::error::{DriverError, DriverResult};
use crate::frame::PixelFormat;
use crate::nodemap::{names, AccessMode, EnumEntryInfo, NodeInfo, NodeKind, NodeMap};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

const TRIGGER_MODE_OFF: i64 = 0;
const TRIGGER_MODE_ON: i64 = 1;
const TRIGGER_SOURCE_SOFTWARE: i64 = 0;

#[derive(Debug, Clone)]
enum SimValue {
    Enumeration {
        entries: Vec<EnumEntryInfo>,
        current: i64,
    },
    Integer(i64),
    Text(String),
    Command,
}

#[derive(Debug, Clone)]
struct SimNode {
    access: AccessMode,
    value: SimValue,
}

impl SimNode {
    fn kind(&self) -> NodeKind {
        match self.value {
            SimValue::Enumeration { .. } => NodeKind::Enumeration,
            SimValue::Integer(_) => NodeKind::Integer,
            SimValue::Text(_) => NodeKind::String,
            SimValue::Command => NodeKind::Command,
        }
    }
}

fn entries(names: &[&str]) -> Vec<EnumEntryInfo> {
    names
        .iter()
        .enumerate()
        .map(|(value, name)| EnumEntryInfo::new(*name, value as i64, AccessMode::ReadOnly))
        .collect()
}

/// Register space of one simulated camera
#[derive(Debug)]
pub struct SimNodeMap {
    serial: String,
    nodes: BTreeMap<String, SimNode>,
    unavailable: HashSet<String>,
    read_only: HashSet<String>,
    write_only: HashSet<String>,
    pending_software_triggers: u32,
    journal: DriverJournal,
}

impl SimNodeMap {
    pub fn new(
        serial: &str,
        model: &str,
        width: u32,
        height: u32,
        sensor_format: PixelFormat,
        journal: DriverJournal,
    ) -> Self {
        let mut nodes = BTreeMap::new();

        let mut insert = |name: &str, access: AccessMode, value: SimValue| {
            nodes.insert(name.to_string(), SimNode { access, value });
        };

        insert(
            names::TRIGGER_MODE,
            AccessMode::ReadWrite,
            SimValue::Enumeration {
                entries: entries(&[names::OFF, names::ON]),
                current: TRIGGER_MODE_OFF,
            },
        );
        insert(
            names::TRIGGER_SOURCE,
            AccessMode::ReadWrite,
            SimValue::Enumeration {
                entries: entries(&[names::SOFTWARE, "Line0", "Line1", "Line2", "Line3"]),
                current: TRIGGER_SOURCE_SOFTWARE,
            },
        );
        insert(names::TRIGGER_SOFTWARE, AccessMode::WriteOnly, SimValue::Command);
        insert(
            names::ACQUISITION_MODE,
            AccessMode::ReadWrite,
            SimValue::Enumeration {
                entries: entries(&[names::CONTINUOUS, "SingleFrame", "MultiFrame"]),
                current: 1,
            },
        );

        let formats = [
            PixelFormat::Mono8,
            PixelFormat::BayerRg8,
            PixelFormat::Rgb8,
            PixelFormat::Bgr8,
        ];
        let format_names: Vec<&str> = formats.iter().map(|f| f.genicam_name()).collect();
        let current_format = formats
            .iter()
            .position(|f| *f == sensor_format)
            .unwrap_or(0) as i64;
        insert(
            names::PIXEL_FORMAT,
            AccessMode::ReadOnly,
            SimValue::Enumeration {
                entries: entries(&format_names),
                current: current_format,
            },
        );

        insert(names::WIDTH, AccessMode::ReadOnly, SimValue::Integer(width as i64));
        insert(names::HEIGHT, AccessMode::ReadOnly, SimValue::Integer(height as i64));
        insert(
            names::DEVICE_SERIAL_NUMBER,
            AccessMode::ReadOnly,
            SimValue::Text(serial.to_string()),
        );
        insert(
            names::DEVICE_MODEL_NAME,
            AccessMode::ReadOnly,
            SimValue::Text(model.to_string()),
        );
        insert(
            names::DEVICE_VENDOR_NAME,
            AccessMode::ReadOnly,
            SimValue::Text("Trigcam Simulated Devices".to_string()),
        );

        Self {
            serial: serial.to_string(),
            nodes,
            unavailable: HashSet::new(),
            read_only: HashSet::new(),
            write_only: HashSet::new(),
            pending_software_triggers: 0,
            journal,
        }
    }

    /// Report `node` as not available from now on
    pub fn mark_unavailable(&mut self, node: &str) {
        self.unavailable.insert(node.to_string());
    }

    /// Report `node` as read-only from now on
    pub fn mark_read_only(&mut self, node: &str) {
        self.read_only.insert(node.to_string());
    }

    /// Report `node` as write-only from now on
    pub fn mark_write_only(&mut self, node: &str) {
        self.write_only.insert(node.to_string());
    }

    fn current(&self, node: &str) -> Option<i64> {
        match self.nodes.get(node).map(|n| &n.value) {
            Some(SimValue::Enumeration { current, .. }) => Some(*current),
            Some(SimValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn trigger_armed(&self) -> bool {
        self.current(names::TRIGGER_MODE) == Some(TRIGGER_MODE_ON)
    }

    pub fn software_source_selected(&self) -> bool {
        self.current(names::TRIGGER_SOURCE) == Some(TRIGGER_SOURCE_SOFTWARE)
    }

    /// Consume one executed software trigger, if any
    pub fn take_software_trigger(&mut self) -> bool {
        if self.pending_software_triggers > 0 {
            self.pending_software_triggers -= 1;
            true
        } else {
            false
        }
    }

    fn effective_access(&self, name: &str, node: &SimNode) -> AccessMode {
        if self.unavailable.contains(name) {
            return AccessMode::NotAvailable;
        }

        // The source is locked while the trigger is armed
        if name == names::TRIGGER_SOURCE && self.trigger_armed() {
            return AccessMode::ReadOnly;
        }

        if self.read_only.contains(name) {
            return match node.access {
                AccessMode::WriteOnly => AccessMode::NotAvailable,
                AccessMode::ReadWrite => AccessMode::ReadOnly,
                other => other,
            };
        }

        if self.write_only.contains(name) {
            return match node.access {
                AccessMode::ReadOnly => AccessMode::NotAvailable,
                AccessMode::ReadWrite => AccessMode::WriteOnly,
                other => other,
            };
        }

        node.access
    }

    fn lookup(&self, name: &str) -> DriverResult<(&SimNode, AccessMode)> {
        let node = self.nodes.get(name).ok_or_else(|| DriverError::UnknownNode {
            serial: self.serial.clone(),
            node: name.to_string(),
        })?;
        Ok((node, self.effective_access(name, node)))
    }

    fn denied(&self, node: &str) -> DriverError {
        DriverError::AccessDenied {
            serial: self.serial.clone(),
            node: node.to_string(),
        }
    }
}

impl NodeMap for SimNodeMap {
    fn node(&self, name: &str) -> Option<NodeInfo> {
        self.nodes
            .get(name)
            .map(|node| NodeInfo::new(name, node.kind(), self.effective_access(name, node)))
    }

    fn enum_entries(&self, node: &str) -> Vec<EnumEntryInfo> {
        match self.nodes.get(node).map(|n| &n.value) {
            Some(SimValue::Enumeration { entries, .. }) => entries.clone(),
            _ => Vec::new(),
        }
    }

    fn get_int_value(&self, node: &str) -> DriverResult<i64> {
        let (sim_node, access) = self.lookup(node)?;
        if !access.is_readable() {
            return Err(self.denied(node));
        }

        match &sim_node.value {
            SimValue::Enumeration { current, .. } => Ok(*current),
            SimValue::Integer(value) => Ok(*value),
            _ => Err(DriverError::TypeMismatch {
                node: node.to_string(),
                expected: "Integer".to_string(),
            }),
        }
    }

    fn set_int_value(&mut self, node: &str, value: i64) -> DriverResult<()> {
        let (_, access) = self.lookup(node)?;
        if !access.is_writable() {
            return Err(self.denied(node));
        }

        let serial = self.serial.clone();
        match self.nodes.get_mut(node).map(|n| &mut n.value) {
            Some(SimValue::Enumeration { entries, current }) => {
                if !entries.iter().any(|entry| entry.value == value) {
                    return Err(DriverError::ValueOutOfRange {
                        node: node.to_string(),
                        value,
                    });
                }
                *current = value;
            }
            Some(SimValue::Integer(current)) => *current = value,
            _ => {
                return Err(DriverError::TypeMismatch {
                    node: node.to_string(),
                    expected: "Integer".to_string(),
                })
            }
        }

        trace!("Camera {} node {} = {}", serial, node, value);
        self.journal.record(DriverEvent::SetValue {
            serial,
            node: node.to_string(),
            value,
        });

        // Disarming discards triggers that never produced a frame
        if node == names::TRIGGER_MODE && value == TRIGGER_MODE_OFF {
            self.pending_software_triggers = 0;
        }

        Ok(())
    }

    fn get_string_value(&self, node: &str) -> DriverResult<String> {
        let (sim_node, access) = self.lookup(node)?;
        if !access.is_readable() {
            return Err(self.denied(node));
        }

        match &sim_node.value {
            SimValue::Text(text) => Ok(text.clone()),
            _ => Err(DriverError::TypeMismatch {
                node: node.to_string(),
                expected: "String".to_string(),
            }),
        }
    }

    fn execute(&mut self, node: &str) -> DriverResult<()> {
        let (sim_node, access) = self.lookup(node)?;
        if !access.is_writable() {
            return Err(self.denied(node));
        }
        if !matches!(sim_node.value, SimValue::Command) {
            return Err(DriverError::TypeMismatch {
                node: node.to_string(),
                expected: "Command".to_string(),
            });
        }

        self.journal.record(DriverEvent::Execute {
            serial: self.serial.clone(),
            node: node.to_string(),
        });

        if node == names::TRIGGER_SOFTWARE {
            if self.trigger_armed() && self.software_source_selected() {
                self.pending_software_triggers += 1;
            } else {
                debug!(
                    "Camera {} ignored software trigger (trigger not armed for software)",
                    self.serial
                );
            }
        }

        Ok(())
    }
}
