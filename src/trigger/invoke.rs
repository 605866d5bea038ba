use super::TriggerSource;
use crate::camera::CameraDevice;
use crate::error::Result;
use crate::frame::Frame;
use crate::input::OperatorInput;
use crate::nodemap::{self, names};
use tracing::debug;

pub const SOFTWARE_TRIGGER_PROMPT: &str = "Press the Enter key to initiate software trigger.";
pub const HARDWARE_TRIGGER_NOTICE: &str = "Use the hardware to trigger image acquisition.";

/// Fire one trigger on `camera` and fetch the frame it produces.
///
/// With a software source the operator confirms first and `TriggerSoftware`
/// is executed on `camera`. With a hardware source the operator is told to
/// use the hardware and the call waits for the line. Blocks until the driver
/// hands a frame back. The caller owns the returned frame and must release it
/// before triggering this camera again.
pub fn grab_next_image_by_trigger(
    camera: &mut dyn CameraDevice,
    source: TriggerSource,
    operator: &mut dyn OperatorInput,
) -> Result<Frame> {
    match source {
        TriggerSource::Software => {
            operator.wait_for_confirmation(SOFTWARE_TRIGGER_PROMPT)?;
            nodemap::execute_command(camera.node_map_mut(), names::TRIGGER_SOFTWARE)?;
        }
        TriggerSource::Hardware => operator.notify(HARDWARE_TRIGGER_NOTICE)?,
    }

    let frame = camera.next_frame()?;
    debug!(
        "Camera {} returned frame {} after {} trigger",
        camera.serial(),
        frame.id,
        source
    );

    Ok(frame)
}
