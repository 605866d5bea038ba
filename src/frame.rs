use crate::error::{DriverError, DriverResult};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Pixel layouts a camera can deliver or a frame can be converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8-bit monochrome
    Mono8,
    /// 8-bit Bayer mosaic, RG/GB pattern
    BayerRg8,
    /// 24-bit RGB
    Rgb8,
    /// 24-bit BGR
    Bgr8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Mono8 | PixelFormat::BayerRg8 => 1,
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
        }
    }

    /// Name of the matching `PixelFormat` node entry
    pub fn genicam_name(&self) -> &'static str {
        match self {
            PixelFormat::Mono8 => "Mono8",
            PixelFormat::BayerRg8 => "BayerRG8",
            PixelFormat::Rgb8 => "RGB8",
            PixelFormat::Bgr8 => "BGR8",
        }
    }
}

/// Transfer status the driver attaches to every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageStatus {
    Complete,
    MissingPackets,
    BufferOverrun,
    LeaderMissing,
}

impl std::fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ImageStatus::Complete => "complete",
            ImageStatus::MissingPackets => "missing packets",
            ImageStatus::BufferOverrun => "buffer overrun",
            ImageStatus::LeaderMissing => "leader missing",
        };
        f.write_str(text)
    }
}

/// One image handed out by a camera. Must go back through
/// `CameraDevice::release_frame` before the camera delivers the next one.
#[derive(Debug)]
pub struct Frame {
    /// Per-camera frame counter
    pub id: u64,
    /// Serial number of the camera that produced the frame
    pub serial: String,
    pub timestamp: SystemTime,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
    pub status: ImageStatus,
}

impl Frame {
    pub fn new(
        id: u64,
        serial: String,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
        status: ImageStatus,
    ) -> Self {
        Self {
            id,
            serial,
            timestamp: SystemTime::now(),
            width,
            height,
            format,
            data,
            status,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.status != ImageStatus::Complete
    }

    pub fn expected_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    pub fn validate_size(&self) -> bool {
        self.data.len() == self.expected_size()
    }

    /// Convert the pixel buffer into `target`.
    ///
    /// Bayer data is demosaiced per 2x2 cell (red, averaged greens, blue).
    pub fn convert(&self, target: PixelFormat) -> DriverResult<ConvertedImage> {
        if self.is_incomplete() {
            return Err(DriverError::Conversion {
                details: format!("frame {} is incomplete ({})", self.id, self.status),
            });
        }

        if !self.validate_size() {
            return Err(DriverError::Conversion {
                details: format!(
                    "frame {} holds {} bytes, expected {}",
                    self.id,
                    self.data.len(),
                    self.expected_size()
                ),
            });
        }

        if target == PixelFormat::BayerRg8 {
            return Err(DriverError::Conversion {
                details: "cannot convert into a Bayer mosaic".to_string(),
            });
        }

        let rgb = self.to_rgb();
        let data = match target {
            PixelFormat::Rgb8 => rgb,
            PixelFormat::Bgr8 => rgb
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
            PixelFormat::Mono8 => rgb
                .chunks_exact(3)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
            PixelFormat::BayerRg8 => unreachable!("rejected above"),
        };

        Ok(ConvertedImage {
            width: self.width,
            height: self.height,
            format: target,
            data,
        })
    }

    fn to_rgb(&self) -> Vec<u8> {
        let width = self.width as usize;
        let height = self.height as usize;

        match self.format {
            PixelFormat::Rgb8 => self.data.clone(),
            PixelFormat::Bgr8 => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
            PixelFormat::Mono8 => self.data.iter().flat_map(|&v| [v, v, v]).collect(),
            PixelFormat::BayerRg8 => {
                let at = |x: usize, y: usize| -> u8 {
                    self.data[y.min(height - 1) * width + x.min(width - 1)]
                };
                let mut rgb = Vec::with_capacity(width * height * 3);
                for y in 0..height {
                    let y0 = y & !1;
                    for x in 0..width {
                        let x0 = x & !1;
                        let r = at(x0, y0);
                        let g = ((at(x0 + 1, y0) as u16 + at(x0, y0 + 1) as u16) / 2) as u8;
                        let b = at(x0 + 1, y0 + 1);
                        rgb.extend_from_slice(&[r, g, b]);
                    }
                }
                rgb
            }
        }
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// Output of [`Frame::convert`]; owns its pixels, independent of the frame
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl ConvertedImage {
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(format: PixelFormat, width: u32, height: u32, data: Vec<u8>) -> Frame {
        Frame::new(1, "CAM-1".to_string(), width, height, format, data, ImageStatus::Complete)
    }

    #[test]
    fn test_pixel_format_properties() {
        assert_eq!(PixelFormat::Mono8.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::BayerRg8.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::Bgr8.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::BayerRg8.genicam_name(), "BayerRG8");
    }

    #[test]
    fn test_frame_size_validation() {
        let valid = frame(PixelFormat::Mono8, 4, 2, vec![0u8; 8]);
        assert!(valid.validate_size());

        let invalid = frame(PixelFormat::Bgr8, 4, 2, vec![0u8; 8]);
        assert!(!invalid.validate_size());
        assert!(invalid.convert(PixelFormat::Rgb8).is_err());
    }

    #[test]
    fn test_bayer_to_bgr_conversion() {
        // One RGGB cell: R=200, G=100/50, B=10
        let bayer = frame(PixelFormat::BayerRg8, 2, 2, vec![200, 100, 50, 10]);

        let converted = bayer.convert(PixelFormat::Bgr8).unwrap();

        assert_eq!(converted.format, PixelFormat::Bgr8);
        assert_eq!(converted.data.len(), 2 * 2 * 3);
        assert_eq!(&converted.data[0..3], &[10, 75, 200]);
        assert_eq!(converted.row_bytes(), 6);
    }

    #[test]
    fn test_mono_to_rgb_replicates_channels() {
        let mono = frame(PixelFormat::Mono8, 2, 1, vec![7, 9]);

        let converted = mono.convert(PixelFormat::Rgb8).unwrap();

        assert_eq!(converted.data, vec![7, 7, 7, 9, 9, 9]);
    }

    #[test]
    fn test_rgb_to_mono_uses_luma() {
        let rgb = frame(PixelFormat::Rgb8, 1, 1, vec![255, 255, 255]);

        let converted = rgb.convert(PixelFormat::Mono8).unwrap();

        assert_eq!(converted.data, vec![255]);
    }

    #[test]
    fn test_incomplete_frame_is_not_converted() {
        let mut incomplete = frame(PixelFormat::Mono8, 2, 1, vec![1]);
        incomplete.status = ImageStatus::MissingPackets;

        assert!(incomplete.is_incomplete());
        assert!(matches!(
            incomplete.convert(PixelFormat::Bgr8),
            Err(DriverError::Conversion { .. })
        ));
    }

    #[test]
    fn test_odd_dimension_bayer_is_clamped() {
        let bayer = frame(PixelFormat::BayerRg8, 3, 3, vec![10; 9]);

        let converted = bayer.convert(PixelFormat::Rgb8).unwrap();

        assert_eq!(converted.data.len(), 27);
    }
}
