use serde::{Deserialize, Serialize};

/// GenICam access mode of a node or enumeration entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    /// Node is not implemented by the device
    NotImplemented,
    /// Node exists but is currently not available
    NotAvailable,
    /// Write only
    WriteOnly,
    /// Read only
    ReadOnly,
    /// Read and write
    ReadWrite,
}

impl AccessMode {
    pub fn is_available(&self) -> bool {
        !matches!(self, AccessMode::NotImplemented | AccessMode::NotAvailable)
    }

    pub fn is_readable(&self) -> bool {
        matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
    }
}

/// Interface type of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Enumeration,
    Command,
    Integer,
    String,
}

/// Snapshot of a node's description at the time it was queried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub kind: NodeKind,
    pub access: AccessMode,
}

impl NodeInfo {
    pub fn new<S: Into<String>>(name: S, kind: NodeKind, access: AccessMode) -> Self {
        Self {
            name: name.into(),
            kind,
            access,
        }
    }
}

/// One selectable entry of an enumeration node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntryInfo {
    pub name: String,
    pub value: i64,
    pub access: AccessMode,
}

impl EnumEntryInfo {
    pub fn new<S: Into<String>>(name: S, value: i64, access: AccessMode) -> Self {
        Self {
            name: name.into(),
            value,
            access,
        }
    }
}

/// Level of access an operation needs on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}
