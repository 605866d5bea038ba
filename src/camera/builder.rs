use super::sim::SimulatedSystem;
use crate::config::SimulatorConfig;
use crate::error::{Result, TrigcamError};

/// Builder for the simulated camera system
pub struct CameraSystemBuilder {
    config: Option<SimulatorConfig>,
    camera_count: Option<usize>,
}

impl CameraSystemBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            camera_count: None,
        }
    }

    pub fn config(mut self, config: SimulatorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the configured number of cameras
    pub fn camera_count(mut self, count: usize) -> Self {
        self.camera_count = Some(count);
        self
    }

    pub fn build(self) -> Result<SimulatedSystem> {
        let mut config = self
            .config
            .ok_or_else(|| TrigcamError::system("Simulator configuration must be specified"))?;

        if let Some(count) = self.camera_count {
            config.camera_count = count;
        }

        if config.resolution.0 < 2 || config.resolution.1 < 2 {
            return Err(TrigcamError::system(format!(
                "Simulator resolution {}x{} is too small",
                config.resolution.0, config.resolution.1
            )));
        }

        Ok(SimulatedSystem::new(config))
    }
}

impl Default for CameraSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}
