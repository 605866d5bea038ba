use super::{AcquisitionReport, DeviceStats};
use crate::camera::{CameraDevice, CameraList};
use crate::config::{AcquisitionConfig, DisplayConfig};
use crate::display::{DisplayConverter, FrameRenderer};
use crate::error::{Result, TrigcamError};
use crate::frame::{Frame, PixelFormat};
use crate::input::OperatorInput;
use crate::nodemap::{self, names};
use crate::trigger::{self, TriggerSource};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Round-robin acquisition over every camera until the operator stops it
pub struct AcquisitionLoop {
    source: TriggerSource,
    pixel_format: PixelFormat,
    resolution: (u32, u32),
    label_prefix: String,
    stop_key: char,
    key_poll: Duration,
}

impl AcquisitionLoop {
    pub fn new(
        source: TriggerSource,
        acquisition: &AcquisitionConfig,
        display: &DisplayConfig,
    ) -> Self {
        Self {
            source,
            pixel_format: acquisition.pixel_format,
            resolution: display.resolution,
            label_prefix: display.label_prefix.clone(),
            stop_key: acquisition.stop_key(),
            key_poll: acquisition.key_poll_interval(),
        }
    }

    /// View label of the camera at `index`
    pub fn label(&self, index: usize) -> String {
        format!("{}{}", self.label_prefix, index)
    }

    /// Start every camera, cycle until a stop is requested, then stop them.
    ///
    /// Only a failure while starting aborts with an error; faults on single
    /// cameras during the cycles are recorded in the report and the other
    /// cameras keep going.
    pub fn run(
        &self,
        cameras: &mut CameraList,
        operator: &mut dyn OperatorInput,
        renderer: &mut dyn FrameRenderer,
    ) -> Result<AcquisitionReport> {
        if cameras.is_empty() {
            return Err(TrigcamError::NoCameras);
        }

        info!("*** IMAGE ACQUISITION ***");
        self.start_all(cameras)?;

        let mut report = AcquisitionReport::new(self.source);
        report.devices = cameras
            .iter()
            .enumerate()
            .map(|(index, camera)| DeviceStats::new(index, camera.serial()))
            .collect();

        let hint = format!("Press '{}' to stop acquisition.", self.stop_key);
        if let Err(e) = operator.notify(&hint) {
            warn!("Could not show the stop key hint: {}", e);
        }

        let mut stop = false;
        let mut operator_lost = false;
        while !stop {
            for (index, stats) in report.devices.iter_mut().enumerate() {
                if operator_lost {
                    debug!("Skipping camera {} for the rest of the cycle", index);
                    continue;
                }
                let Some(camera) = cameras.get_mut(index) else {
                    continue;
                };

                if let Err(e) = self.service(index, camera, operator, renderer, stats) {
                    error!("Camera {} ({}) failed: {}", index, stats.serial, e);
                    stats.record_error(&e);
                    if matches!(e, TrigcamError::Input { .. }) {
                        warn!("Operator input unavailable; stopping after this cycle");
                        operator_lost = true;
                        stop = true;
                    }
                }

                match operator.poll_stop(self.key_poll) {
                    Ok(true) => {
                        report.stopped_by_operator = true;
                        stop = true;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Stop key poll failed, stopping after this cycle: {}", e);
                        stop = true;
                    }
                }
            }

            report.cycles += 1;
            debug!("Acquisition cycle {} complete", report.cycles);
        }

        for (index, e) in Self::end_all(cameras) {
            if let Some(stats) = report.devices.get_mut(index) {
                stats.record_error(&e);
            }
        }

        report.success = report.total_errors() == 0;
        info!(
            "Acquisition finished after {} cycle(s): {} frame(s) retrieved, {} released",
            report.cycles,
            report.total_retrieved(),
            report.total_released()
        );

        Ok(report)
    }

    fn start_all(&self, cameras: &mut CameraList) -> Result<()> {
        for index in 0..cameras.len() {
            let Some(camera) = cameras.get_mut(index) else {
                continue;
            };

            if let Err(e) = Self::start(camera) {
                error!("Camera {} failed to start acquisition: {}", index, e);
                Self::end_all(cameras);
                return Err(e);
            }
        }
        Ok(())
    }

    fn start(camera: &mut dyn CameraDevice) -> Result<()> {
        nodemap::set_enum_entry(
            camera.node_map_mut(),
            names::ACQUISITION_MODE,
            names::CONTINUOUS,
        )?;
        info!("Camera {} acquisition mode set to continuous...", camera.serial());

        camera.begin_acquisition()?;
        Ok(())
    }

    /// Stop every streaming camera in ascending order, collecting failures
    fn end_all(cameras: &mut CameraList) -> Vec<(usize, TrigcamError)> {
        let mut failures: Vec<(usize, TrigcamError)> = Vec::new();

        for (index, camera) in cameras.iter_mut().enumerate() {
            if !camera.is_streaming() {
                continue;
            }
            if let Err(e) = camera.end_acquisition() {
                error!("Camera {} failed to end acquisition: {}", index, e);
                failures.push((index, e.into()));
            }
        }

        failures
    }

    fn service(
        &self,
        index: usize,
        camera: &mut dyn CameraDevice,
        operator: &mut dyn OperatorInput,
        renderer: &mut dyn FrameRenderer,
        stats: &mut DeviceStats,
    ) -> Result<()> {
        let frame = trigger::grab_next_image_by_trigger(camera, self.source, operator)?;
        stats.frames_retrieved += 1;

        let presented = self.present(index, &frame, renderer, stats);

        // The frame goes back even when presenting it failed
        let released = camera.release_frame(frame);
        match &released {
            Ok(()) => stats.frames_released += 1,
            Err(e) => warn!("Camera {} could not release its frame: {}", index, e),
        }

        presented?;
        released?;
        Ok(())
    }

    fn present(
        &self,
        index: usize,
        frame: &Frame,
        renderer: &mut dyn FrameRenderer,
        stats: &mut DeviceStats,
    ) -> Result<()> {
        if frame.is_incomplete() {
            warn!(
                "Camera {} image incomplete with image status {}...",
                index, frame.status
            );
            stats.frames_incomplete += 1;
            return Ok(());
        }

        info!(
            "Camera {} grabbed image {}, width = {}, height = {}",
            index, frame.id, frame.width, frame.height
        );

        let converted = frame.convert(self.pixel_format)?;
        let image = DisplayConverter::prepare(&converted, self.resolution)?;
        renderer.render(&self.label(index), &image)?;
        stats.frames_displayed += 1;

        Ok(())
    }
}
