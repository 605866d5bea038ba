use super::{DisplayStats, FrameRenderer};
use crate::error::{DisplayError, Result};
use image::{ImageFormat, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes the latest image of each view to `<dir>/<label>.png`
pub struct SnapshotRenderer {
    dir: PathBuf,
    stats: DisplayStats,
}

impl SnapshotRenderer {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!("Writing display snapshots to {}", dir.display());

        Ok(Self {
            dir,
            stats: DisplayStats::default(),
        })
    }

    pub fn snapshot_path(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{}.png", label))
    }
}

impl FrameRenderer for SnapshotRenderer {
    fn render(&mut self, label: &str, image: &RgbImage) -> Result<()> {
        let path = self.snapshot_path(label);

        if let Err(e) = image.save_with_format(&path, ImageFormat::Png) {
            self.stats.record_render_error();
            return Err(DisplayError::Snapshot {
                path: path.display().to_string(),
                details: e.to_string(),
            }
            .into());
        }

        debug!("Saved snapshot {}", path.display());
        self.stats.record_frame_render(label);
        Ok(())
    }

    fn stats(&self) -> &DisplayStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_written_per_label() {
        let temp_dir = TempDir::new().unwrap();
        let mut renderer = SnapshotRenderer::new(temp_dir.path().join("views")).unwrap();

        renderer
            .render("Cam0", &RgbImage::from_pixel(4, 3, Rgb([1, 2, 3])))
            .unwrap();
        renderer
            .render("Cam0", &RgbImage::from_pixel(4, 3, Rgb([9, 9, 9])))
            .unwrap();

        let saved = image::open(renderer.snapshot_path("Cam0")).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (4, 3));
        assert_eq!(saved.get_pixel(0, 0).0, [9, 9, 9]);
        assert_eq!(renderer.stats().frames_rendered, 2);
        assert!(!renderer.snapshot_path("Cam1").exists());
    }

    #[test]
    fn test_unwritable_snapshot_is_counted() {
        let temp_dir = TempDir::new().unwrap();
        let mut renderer = SnapshotRenderer::new(temp_dir.path()).unwrap();

        let result = renderer.render("missing/Cam0", &RgbImage::new(2, 2));

        assert!(result.is_err());
        assert_eq!(renderer.stats().render_errors, 1);
    }
}
