mod converter;
mod headless;
mod snapshot;
mod stats;
mod terminal;

pub use converter::DisplayConverter;
pub use headless::HeadlessRenderer;
pub use snapshot::SnapshotRenderer;
pub use stats::DisplayStats;
pub use terminal::TerminalRenderer;

use crate::config::{DisplayBackend, DisplayConfig};
use crate::error::Result;
use image::RgbImage;
use tracing::info;

/// Presents one labeled view per camera
pub trait FrameRenderer {
    /// Show `image` in the view named `label`, replacing its previous content
    fn render(&mut self, label: &str, image: &RgbImage) -> Result<()>;

    fn stats(&self) -> &DisplayStats;
}

/// Build the renderer selected by `config.backend`
pub fn create_renderer(config: &DisplayConfig) -> Result<Box<dyn FrameRenderer>> {
    info!("Using {:?} display backend", config.backend);

    let renderer: Box<dyn FrameRenderer> = match config.backend {
        DisplayBackend::Terminal => Box::new(TerminalRenderer::new(config.terminal_columns)),
        DisplayBackend::Snapshot => Box::new(SnapshotRenderer::new(&config.snapshot_dir)?),
        DisplayBackend::Headless => Box::new(HeadlessRenderer::new()),
    };
    Ok(renderer)
}
