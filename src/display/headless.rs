use super::{DisplayStats, FrameRenderer};
use crate::error::Result;
use image::RgbImage;
use tracing::trace;

/// Renderer that only keeps a record of what it was asked to show
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    rendered: Vec<(String, u32, u32)>,
    stats: DisplayStats,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label and dimensions of every rendered image, in order
    pub fn rendered(&self) -> &[(String, u32, u32)] {
        &self.rendered
    }
}

impl FrameRenderer for HeadlessRenderer {
    fn render(&mut self, label: &str, image: &RgbImage) -> Result<()> {
        trace!("{}: {}x{}", label, image.width(), image.height());
        self.rendered
            .push((label.to_string(), image.width(), image.height()));
        self.stats.record_frame_render(label);
        Ok(())
    }

    fn stats(&self) -> &DisplayStats {
        &self.stats
    }
}
