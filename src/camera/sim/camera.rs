use super::journal::{DriverEvent, DriverJournal};
use super::nodes::SimNodeMap;
use crate::camera::CameraDevice;
use crate::error::{DriverError, DriverResult};
use crate::frame::{Frame, ImageStatus, PixelFormat};
use crate::nodemap::NodeMap;
use crossbeam::channel::Receiver;
use tracing::{debug, info, trace, warn};

/// Sensor characteristics of a simulated camera
#[derive(Debug, Clone, Copy)]
pub struct SensorSpec {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Every Nth frame is delivered incomplete (0 disables)
    pub incomplete_every: u64,
}

/// GenICam-like camera backed entirely by memory.
///
/// Free-runs while `TriggerMode` is Off. Once armed it delivers one frame
/// per executed `TriggerSoftware` (software source) or per pulse on its
/// trigger line (any `Line*` source).
pub struct SimulatedCamera {
    index: usize,
    serial: String,
    nodes: SimNodeMap,
    sensor: SensorSpec,
    line: Receiver<u64>,
    journal: DriverJournal,
    initialized: bool,
    streaming: bool,
    outstanding: Option<u64>,
    frame_counter: u64,
}

impl SimulatedCamera {
    pub fn new(
        index: usize,
        serial: String,
        sensor: SensorSpec,
        line: Receiver<u64>,
        journal: DriverJournal,
    ) -> Self {
        let model = format!(
            "Simulated {}x{} {}",
            sensor.width,
            sensor.height,
            sensor.format.genicam_name()
        );
        let nodes = SimNodeMap::new(
            &serial,
            &model,
            sensor.width,
            sensor.height,
            sensor.format,
            journal.clone(),
        );

        Self {
            index,
            serial,
            nodes,
            sensor,
            line,
            journal,
            initialized: false,
            streaming: false,
            outstanding: None,
            frame_counter: 0,
        }
    }

    pub fn sim_nodes_mut(&mut self) -> &mut SimNodeMap {
        &mut self.nodes
    }

    fn wait_for_trigger(&mut self) -> DriverResult<()> {
        if !self.nodes.trigger_armed() {
            return Ok(());
        }

        if self.nodes.software_source_selected() {
            if self.nodes.take_software_trigger() {
                Ok(())
            } else {
                Err(DriverError::NoTriggerPending {
                    serial: self.serial.clone(),
                })
            }
        } else {
            let pulse = self.line.recv().map_err(|_| DriverError::LineDisconnected {
                serial: self.serial.clone(),
            })?;
            trace!("Camera {} saw line pulse {}", self.serial, pulse);
            Ok(())
        }
    }

    fn capture(&mut self) -> Frame {
        self.frame_counter += 1;
        let id = self.frame_counter;
        let mut data = render_test_pattern(&self.sensor, id, self.index);

        let incomplete = self.sensor.incomplete_every > 0 && id % self.sensor.incomplete_every == 0;
        let status = if incomplete {
            data.truncate(data.len() / 2);
            ImageStatus::MissingPackets
        } else {
            ImageStatus::Complete
        };

        Frame::new(
            id,
            self.serial.clone(),
            self.sensor.width,
            self.sensor.height,
            self.sensor.format,
            data,
            status,
        )
    }
}

/// Diagonal gradient that drifts with the frame id, offset per camera
fn render_test_pattern(sensor: &SensorSpec, frame_id: u64, camera_index: usize) -> Vec<u8> {
    let width = sensor.width as u64;
    let height = sensor.height as u64;
    let shift = frame_id * 8 + camera_index as u64 * 64;
    let channels = sensor.format.bytes_per_pixel();

    let mut data = Vec::with_capacity((width * height) as usize * channels);
    for y in 0..height {
        for x in 0..width {
            let base = ((x * 255 / width) + (y * 255 / height) + shift) as u8;
            match channels {
                1 => data.push(base),
                _ => data.extend_from_slice(&[base, base.wrapping_add(85), base.wrapping_add(170)]),
            }
        }
    }
    data
}

impl CameraDevice for SimulatedCamera {
    fn serial(&self) -> &str {
        &self.serial
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn init(&mut self) -> DriverResult<()> {
        if self.initialized {
            return Err(DriverError::AlreadyInitialized {
                serial: self.serial.clone(),
            });
        }

        self.initialized = true;
        self.journal.record(DriverEvent::Init {
            serial: self.serial.clone(),
        });
        debug!("Simulated camera {} initialized", self.serial);
        Ok(())
    }

    fn deinit(&mut self) -> DriverResult<()> {
        if !self.initialized {
            return Err(DriverError::NotInitialized {
                serial: self.serial.clone(),
            });
        }

        if self.streaming {
            warn!(
                "Camera {} deinitialized while acquiring; stopping acquisition",
                self.serial
            );
            self.end_acquisition()?;
        }

        self.initialized = false;
        self.journal.record(DriverEvent::Deinit {
            serial: self.serial.clone(),
        });
        debug!("Simulated camera {} deinitialized", self.serial);
        Ok(())
    }

    fn node_map(&self) -> &dyn NodeMap {
        &self.nodes
    }

    fn node_map_mut(&mut self) -> &mut dyn NodeMap {
        &mut self.nodes
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn begin_acquisition(&mut self) -> DriverResult<()> {
        if !self.initialized {
            return Err(DriverError::NotInitialized {
                serial: self.serial.clone(),
            });
        }
        if self.streaming {
            return Err(DriverError::AlreadyStreaming {
                serial: self.serial.clone(),
            });
        }

        // Pulses that arrived before streaming started are stale
        while self.line.try_recv().is_ok() {}

        self.streaming = true;
        self.journal.record(DriverEvent::BeginAcquisition {
            serial: self.serial.clone(),
        });
        info!("Camera {} started acquiring images", self.serial);
        Ok(())
    }

    fn end_acquisition(&mut self) -> DriverResult<()> {
        if !self.streaming {
            return Err(DriverError::NotStreaming {
                serial: self.serial.clone(),
            });
        }

        self.streaming = false;
        self.journal.record(DriverEvent::EndAcquisition {
            serial: self.serial.clone(),
        });
        info!("Camera {} stopped acquiring images", self.serial);
        Ok(())
    }

    fn next_frame(&mut self) -> DriverResult<Frame> {
        if !self.initialized {
            return Err(DriverError::NotInitialized {
                serial: self.serial.clone(),
            });
        }
        if !self.streaming {
            return Err(DriverError::NotStreaming {
                serial: self.serial.clone(),
            });
        }
        if let Some(frame_id) = self.outstanding {
            return Err(DriverError::FrameOutstanding {
                serial: self.serial.clone(),
                frame_id,
            });
        }

        self.wait_for_trigger()?;

        let frame = self.capture();
        self.outstanding = Some(frame.id);
        self.journal.record(DriverEvent::FrameDelivered {
            serial: self.serial.clone(),
            frame_id: frame.id,
        });
        trace!(
            "Camera {} delivered frame {} ({})",
            self.serial,
            frame.id,
            frame.status
        );

        Ok(frame)
    }

    fn release_frame(&mut self, frame: Frame) -> DriverResult<()> {
        if frame.serial != self.serial || self.outstanding != Some(frame.id) {
            return Err(DriverError::UnknownFrame {
                serial: self.serial.clone(),
                frame_id: frame.id,
            });
        }

        self.outstanding = None;
        self.journal.record(DriverEvent::FrameReleased {
            serial: self.serial.clone(),
            frame_id: frame.id,
        });
        Ok(())
    }
}
