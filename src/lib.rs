pub mod acquisition;
pub mod camera;
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod input;
pub mod nodemap;
pub mod session;
pub mod trigger;

pub use acquisition::{AcquisitionLoop, AcquisitionReport, DeviceStats};
pub use camera::{CameraDevice, CameraList, CameraSystem, CameraSystemBuilder};
pub use config::TrigcamConfig;
pub use display::{DisplayConverter, DisplayStats, FrameRenderer};
pub use error::{DisplayError, DriverError, NodeError, Result, TrigcamError};
pub use frame::{ConvertedImage, Frame, ImageStatus, PixelFormat};
pub use input::{ConsoleInput, OperatorInput, ScriptedInput};
pub use nodemap::{AccessMode, NodeMap};
pub use session::{SessionOrchestrator, SessionOutcome, SessionState};
pub use trigger::{
    configure_trigger, grab_next_image_by_trigger, reset_trigger, TriggerMode, TriggerSource,
};
