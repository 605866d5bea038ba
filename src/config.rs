use crate::frame::PixelFormat;
use crate::trigger::TriggerSource;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrigcamConfig {
    pub trigger: TriggerConfig,
    pub acquisition: AcquisitionConfig,
    pub display: DisplayConfig,
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TriggerConfig {
    /// Trigger source used for the whole run (software or hardware)
    #[serde(default = "default_trigger_source")]
    pub source: TriggerSource,

    /// TriggerSource entry selected for hardware triggering
    #[serde(default = "default_hardware_line")]
    pub hardware_line: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AcquisitionConfig {
    /// Pixel format frames are converted into before display
    #[serde(default = "default_pixel_format")]
    pub pixel_format: PixelFormat,

    /// Key that ends the acquisition loop
    #[serde(default = "default_stop_key")]
    pub stop_key: String,

    /// Wait applied when polling for the stop key, in milliseconds
    #[serde(default = "default_key_poll_ms")]
    pub key_poll_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Where converted frames are presented
    #[serde(default = "default_display_backend")]
    pub backend: DisplayBackend,

    /// Presentation size every frame is resized to (width, height)
    #[serde(default = "default_display_resolution")]
    pub resolution: (u32, u32),

    /// Per-camera view label prefix, followed by the camera index
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,

    /// Character columns of each terminal preview
    #[serde(default = "default_terminal_columns")]
    pub terminal_columns: u16,

    /// Directory the snapshot backend writes into
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Number of simulated cameras
    #[serde(default = "default_camera_count")]
    pub camera_count: usize,

    /// Sensor resolution (width, height)
    #[serde(default = "default_sensor_resolution")]
    pub resolution: (u32, u32),

    /// Pixel format delivered by the simulated sensor
    #[serde(default = "default_sensor_format")]
    pub sensor_format: PixelFormat,

    /// Mark every Nth frame incomplete (0 disables)
    #[serde(default = "default_incomplete_every")]
    pub incomplete_every: u64,

    /// Period of the simulated hardware trigger line
    #[serde(default = "default_hardware_pulse_interval_ms")]
    pub hardware_pulse_interval_ms: u64,

    /// Nodes reported as not available on every simulated camera
    #[serde(default)]
    pub unavailable_nodes: Vec<String>,

    /// Nodes reported as read-only on every simulated camera
    #[serde(default)]
    pub read_only_nodes: Vec<String>,

    /// Serial number of the first camera; the rest count up from it
    #[serde(default = "default_serial_base")]
    pub serial_base: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct LoggingConfig {
    /// Optional log file; logs rotate daily when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Display backends
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisplayBackend {
    /// Colored half-block previews drawn with crossterm
    Terminal,
    /// One PNG per camera label, overwritten on every frame
    Snapshot,
    /// Frames are counted but not presented
    Headless,
}

impl std::str::FromStr for DisplayBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "terminal" => Ok(DisplayBackend::Terminal),
            "snapshot" => Ok(DisplayBackend::Snapshot),
            "headless" => Ok(DisplayBackend::Headless),
            other => Err(format!("unknown display backend '{}'", other)),
        }
    }
}

impl AcquisitionConfig {
    /// The configured stop key as a character
    pub fn stop_key(&self) -> char {
        self.stop_key.chars().next().unwrap_or('q')
    }

    pub fn key_poll_interval(&self) -> Duration {
        Duration::from_millis(self.key_poll_ms)
    }
}

impl TrigcamConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("trigger.source", default_trigger_source().as_str())?
            .set_default("trigger.hardware_line", default_hardware_line())?
            .set_default("acquisition.pixel_format", "bgr8")?
            .set_default("acquisition.stop_key", default_stop_key())?
            .set_default("acquisition.key_poll_ms", default_key_poll_ms() as i64)?
            .set_default("display.backend", "terminal")?
            .set_default(
                "display.resolution",
                vec![
                    default_display_resolution().0,
                    default_display_resolution().1,
                ],
            )?
            .set_default("display.label_prefix", default_label_prefix())?
            .set_default(
                "display.terminal_columns",
                default_terminal_columns() as i64,
            )?
            .set_default("display.snapshot_dir", default_snapshot_dir())?
            .set_default("simulator.camera_count", default_camera_count() as i64)?
            .set_default(
                "simulator.resolution",
                vec![default_sensor_resolution().0, default_sensor_resolution().1],
            )?
            .set_default("simulator.sensor_format", "bayer_rg8")?
            .set_default(
                "simulator.incomplete_every",
                default_incomplete_every() as i64,
            )?
            .set_default(
                "simulator.hardware_pulse_interval_ms",
                default_hardware_pulse_interval_ms() as i64,
            )?
            .set_default("simulator.unavailable_nodes", Vec::<String>::new())?
            .set_default("simulator.read_only_nodes", Vec::<String>::new())?
            .set_default("simulator.serial_base", default_serial_base() as i64)?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // TRIGCAM__SIMULATOR__CAMERA_COUNT=4 and friends
            .add_source(Environment::with_prefix("TRIGCAM").separator("__"))
            .build()?;

        let config: TrigcamConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger.hardware_line.trim().is_empty() {
            return Err(ConfigError::Message(
                "Trigger hardware_line must not be empty".to_string(),
            ));
        }

        if self.acquisition.stop_key.chars().count() != 1
            || self.acquisition.stop_key.chars().any(|c| c.is_control())
        {
            return Err(ConfigError::Message(
                "Acquisition stop_key must be a single printable character".to_string(),
            ));
        }

        if self.acquisition.pixel_format == PixelFormat::BayerRg8 {
            return Err(ConfigError::Message(
                "Acquisition pixel_format must be mono8, rgb8 or bgr8".to_string(),
            ));
        }

        if self.display.resolution.0 == 0 || self.display.resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Display resolution must be greater than 0".to_string(),
            ));
        }

        if self.display.label_prefix.is_empty() {
            return Err(ConfigError::Message(
                "Display label_prefix must not be empty".to_string(),
            ));
        }

        if self.display.terminal_columns < 8 {
            return Err(ConfigError::Message(
                "Display terminal_columns must be at least 8".to_string(),
            ));
        }

        if self.simulator.resolution.0 < 2 || self.simulator.resolution.1 < 2 {
            return Err(ConfigError::Message(
                "Simulator resolution must be at least 2x2".to_string(),
            ));
        }

        if self.simulator.hardware_pulse_interval_ms == 0 {
            return Err(ConfigError::Message(
                "Simulator hardware_pulse_interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TrigcamConfig {
    fn default() -> Self {
        Self {
            trigger: TriggerConfig {
                source: default_trigger_source(),
                hardware_line: default_hardware_line(),
            },
            acquisition: AcquisitionConfig {
                pixel_format: default_pixel_format(),
                stop_key: default_stop_key(),
                key_poll_ms: default_key_poll_ms(),
            },
            display: DisplayConfig {
                backend: default_display_backend(),
                resolution: default_display_resolution(),
                label_prefix: default_label_prefix(),
                terminal_columns: default_terminal_columns(),
                snapshot_dir: default_snapshot_dir(),
            },
            simulator: SimulatorConfig {
                camera_count: default_camera_count(),
                resolution: default_sensor_resolution(),
                sensor_format: default_sensor_format(),
                incomplete_every: default_incomplete_every(),
                hardware_pulse_interval_ms: default_hardware_pulse_interval_ms(),
                unavailable_nodes: Vec::new(),
                read_only_nodes: Vec::new(),
                serial_base: default_serial_base(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

// Default value functions
fn default_trigger_source() -> TriggerSource {
    TriggerSource::Software
}
fn default_hardware_line() -> String {
    "Line0".to_string()
}

fn default_pixel_format() -> PixelFormat {
    PixelFormat::Bgr8
}
fn default_stop_key() -> String {
    "q".to_string()
}
fn default_key_poll_ms() -> u64 {
    1
}

fn default_display_backend() -> DisplayBackend {
    DisplayBackend::Terminal
}
fn default_display_resolution() -> (u32, u32) {
    (640, 480)
}
fn default_label_prefix() -> String {
    "Cam".to_string()
}
fn default_terminal_columns() -> u16 {
    64
}
fn default_snapshot_dir() -> String {
    "./snapshots".to_string()
}

fn default_camera_count() -> usize {
    2
}
fn default_sensor_resolution() -> (u32, u32) {
    (1280, 960)
}
fn default_sensor_format() -> PixelFormat {
    PixelFormat::BayerRg8
}
fn default_incomplete_every() -> u64 {
    0
}
fn default_hardware_pulse_interval_ms() -> u64 {
    500
}
fn default_serial_base() -> u32 {
    18_000_000
}
