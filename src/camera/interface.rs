use super::list::CameraList;
use crate::error::DriverResult;
use crate::frame::Frame;
use crate::nodemap::NodeMap;

/// Driver-side handle to one camera.
///
/// Every call is synchronous. `next_frame` blocks until the device
/// delivers an image; on real hardware a trigger that never fires blocks
/// forever, there is no timeout. Only one frame may be outstanding per
/// device: it has to be passed back to `release_frame` before the next
/// `next_frame`, otherwise the driver answers `FrameOutstanding`.
pub trait CameraDevice {
    /// Serial number as reported by the transport layer
    fn serial(&self) -> &str;

    fn is_initialized(&self) -> bool;

    fn init(&mut self) -> DriverResult<()>;

    fn deinit(&mut self) -> DriverResult<()>;

    /// GenICam node map of the device
    fn node_map(&self) -> &dyn NodeMap;

    fn node_map_mut(&mut self) -> &mut dyn NodeMap;

    fn is_streaming(&self) -> bool;

    fn begin_acquisition(&mut self) -> DriverResult<()>;

    fn end_acquisition(&mut self) -> DriverResult<()>;

    /// Block until the next image is available
    fn next_frame(&mut self) -> DriverResult<Frame>;

    /// Hand a frame back to the driver's buffer pool
    fn release_frame(&mut self, frame: Frame) -> DriverResult<()>;
}

/// Entry point of a camera driver.
///
/// Owned explicitly by the caller; dropping it releases the driver, so the
/// `CameraList` it handed out has to be dropped first.
pub trait CameraSystem {
    /// Human readable driver name
    fn name(&self) -> &str;

    /// Enumerate the connected cameras. Ownership of the devices moves into
    /// the returned list, so a second call returns an empty list.
    fn discover(&mut self) -> CameraList;
}
