//! In-memory camera driver used when no vendor hardware is attached.

mod camera;
mod journal;
mod line;
mod nodes;

pub use camera::{SensorSpec, SimulatedCamera};
pub use journal::{DriverEvent, DriverJournal};
pub use line::LinePulseGenerator;
pub use nodes::SimNodeMap;

use super::{CameraDevice, CameraList, CameraSystem};
use crate::config::SimulatorConfig;
use std::time::Duration;
use tracing::{info, warn};

/// Simulated driver instance owning every simulated camera and the
/// hardware trigger line that feeds them
pub struct SimulatedSystem {
    config: SimulatorConfig,
    journal: DriverJournal,
    pending: Option<Vec<SimulatedCamera>>,
    line: Option<LinePulseGenerator>,
}

impl SimulatedSystem {
    pub fn new(config: SimulatorConfig) -> Self {
        info!(
            "Starting simulated camera system with {} camera(s) ({}x{} {})",
            config.camera_count,
            config.resolution.0,
            config.resolution.1,
            config.sensor_format.genicam_name()
        );

        let journal = DriverJournal::new();
        let sensor = SensorSpec {
            width: config.resolution.0,
            height: config.resolution.1,
            format: config.sensor_format,
            incomplete_every: config.incomplete_every,
        };

        let (line, inputs) = if config.camera_count > 0 {
            let (generator, inputs) = LinePulseGenerator::start(
                Duration::from_millis(config.hardware_pulse_interval_ms),
                config.camera_count,
            );
            (Some(generator), inputs)
        } else {
            (None, Vec::new())
        };

        let cameras = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                let serial = (config.serial_base as u64 + index as u64).to_string();
                let mut camera =
                    SimulatedCamera::new(index, serial, sensor, input, journal.clone());

                for node in &config.unavailable_nodes {
                    camera.sim_nodes_mut().mark_unavailable(node);
                }
                for node in &config.read_only_nodes {
                    camera.sim_nodes_mut().mark_read_only(node);
                }

                camera
            })
            .collect();

        Self {
            config,
            journal,
            pending: Some(cameras),
            line,
        }
    }

    /// Record of every driver call made against this system
    pub fn journal(&self) -> DriverJournal {
        self.journal.clone()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }
}

impl CameraSystem for SimulatedSystem {
    fn name(&self) -> &str {
        "simulated"
    }

    fn discover(&mut self) -> CameraList {
        match self.pending.take() {
            Some(cameras) => CameraList::new(
                cameras
                    .into_iter()
                    .map(|camera| Box::new(camera) as Box<dyn CameraDevice>)
                    .collect(),
            ),
            None => {
                warn!("Simulated cameras were already handed out");
                CameraList::default()
            }
        }
    }
}

impl Drop for SimulatedSystem {
    fn drop(&mut self) {
        self.line.take();
        self.journal.record(DriverEvent::SystemReleased);
        info!("Simulated camera system released");
    }
}
