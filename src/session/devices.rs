use crate::camera::{CameraDevice, CameraList};
use crate::error::{Result, TrigcamError};
use crate::nodemap::{self, names};
use tracing::{error, info};

const DEVICE_INFO_NODES: [&str; 3] = [
    names::DEVICE_SERIAL_NUMBER,
    names::DEVICE_MODEL_NAME,
    names::DEVICE_VENDOR_NAME,
];

/// Log the identification strings of a camera
pub(super) fn log_device_info(index: usize, camera: &dyn CameraDevice) {
    info!("*** DEVICE INFORMATION (camera {}) ***", index);

    for node in DEVICE_INFO_NODES {
        match nodemap::read_string(camera.node_map(), node) {
            Ok(value) => info!("{}: {}", node, value),
            Err(_) => info!("{}: Node not readable", node),
        }
    }
}

/// Initialize every camera in ascending order.
///
/// On failure the cameras initialized so far are deinitialized again before
/// the error is returned.
pub(super) fn initialize_all(cameras: &mut CameraList) -> Result<()> {
    for index in 0..cameras.len() {
        let Some(camera) = cameras.get_mut(index) else {
            continue;
        };

        if let Err(e) = camera.init() {
            error!("Camera {} failed to initialize: {}", index, e);
            for (rollback, failure) in deinitialize(cameras, index) {
                error!("Camera {} failed to deinitialize: {}", rollback, failure);
            }
            return Err(e.into());
        }

        log_device_info(index, camera);
    }

    Ok(())
}

/// Deinitialize the first `count` cameras in ascending order, collecting
/// failures instead of stopping at the first one
pub(super) fn deinitialize(cameras: &mut CameraList, count: usize) -> Vec<(usize, TrigcamError)> {
    let mut failures = Vec::new();

    for (index, camera) in cameras.iter_mut().enumerate().take(count) {
        if !camera.is_initialized() {
            continue;
        }
        match camera.deinit() {
            Ok(()) => info!("Camera {} deinitialized", index),
            Err(e) => failures.push((index, TrigcamError::from(e))),
        }
    }

    failures
}
