use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrigcamError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node access error: {0}")]
    Node(#[from] NodeError),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Operator input error: {details}")]
    Input { details: String },

    #[error("Not enough cameras")]
    NoCameras,

    #[error("System error: {message}")]
    System { message: String },
}

/// Precondition failures raised before a node is read, written or executed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("node '{node}' does not exist")]
    NotFound { node: String },

    #[error("node '{node}' is not available")]
    NotAvailable { node: String },

    #[error("node '{node}' is not readable")]
    NotReadable { node: String },

    #[error("node '{node}' is not writable")]
    NotWritable { node: String },

    #[error("node '{node}' has no entry '{entry}'")]
    EntryNotFound { node: String, entry: String },

    #[error("entry '{entry}' of node '{node}' is not available")]
    EntryNotAvailable { node: String, entry: String },

    #[error("entry '{entry}' of node '{node}' is not readable")]
    EntryNotReadable { node: String, entry: String },
}

/// Faults reported by the camera driver itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("camera {serial} is not initialized")]
    NotInitialized { serial: String },

    #[error("camera {serial} is already initialized")]
    AlreadyInitialized { serial: String },

    #[error("camera {serial} is not acquiring images")]
    NotStreaming { serial: String },

    #[error("camera {serial} is already acquiring images")]
    AlreadyStreaming { serial: String },

    #[error("camera {serial} still holds unreleased frame {frame_id}")]
    FrameOutstanding { serial: String, frame_id: u64 },

    #[error("camera {serial} has no pending trigger to produce a frame")]
    NoTriggerPending { serial: String },

    #[error("frame {frame_id} does not belong to camera {serial}")]
    UnknownFrame { serial: String, frame_id: u64 },

    #[error("hardware trigger line for camera {serial} is disconnected")]
    LineDisconnected { serial: String },

    #[error("camera {serial} has no node '{node}'")]
    UnknownNode { serial: String, node: String },

    #[error("access to node '{node}' denied by camera {serial}")]
    AccessDenied { serial: String, node: String },

    #[error("value {value} is out of range for node '{node}'")]
    ValueOutOfRange { node: String, value: i64 },

    #[error("node '{node}' is not of type {expected}")]
    TypeMismatch { node: String, expected: String },

    #[error("pixel conversion failed: {details}")]
    Conversion { details: String },
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Format conversion failed: {details}")]
    FormatConversion { details: String },

    #[error("Terminal rendering failed: {details}")]
    Terminal { details: String },

    #[error("Snapshot write failed for {path}: {details}")]
    Snapshot { path: String, details: String },
}

impl TrigcamError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn input<S: Into<String>>(details: S) -> Self {
        Self::Input {
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrigcamError>;

pub type DriverResult<T> = std::result::Result<T, DriverError>;
