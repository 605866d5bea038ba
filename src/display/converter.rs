use crate::error::{DisplayError, Result};
use crate::frame::{ConvertedImage, PixelFormat};
use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::trace;

/// Turns converted camera frames into presentable images
pub struct DisplayConverter;

impl DisplayConverter {
    /// Wrap a converted frame as an RGB image, reordering or expanding
    /// channels as needed
    pub fn to_rgb_image(converted: &ConvertedImage) -> Result<RgbImage> {
        let expected_size = converted.row_bytes() * converted.height as usize;
        if converted.data.len() != expected_size {
            return Err(DisplayError::FormatConversion {
                details: format!(
                    "Invalid {} data size: expected {}, got {}",
                    converted.format.genicam_name(),
                    expected_size,
                    converted.data.len()
                ),
            }
            .into());
        }

        let rgb: Vec<u8> = match converted.format {
            PixelFormat::Rgb8 => converted.data.clone(),
            PixelFormat::Bgr8 => converted
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
            PixelFormat::Mono8 => converted.data.iter().flat_map(|&v| [v, v, v]).collect(),
            PixelFormat::BayerRg8 => {
                return Err(DisplayError::FormatConversion {
                    details: "Bayer data must be demosaiced before display".to_string(),
                }
                .into())
            }
        };

        RgbImage::from_raw(converted.width, converted.height, rgb).ok_or_else(|| {
            DisplayError::FormatConversion {
                details: format!(
                    "Buffer does not fit a {}x{} image",
                    converted.width, converted.height
                ),
            }
            .into()
        })
    }

    /// Resize to the presentation size with linear interpolation
    pub fn resize(image: &RgbImage, width: u32, height: u32) -> RgbImage {
        if image.dimensions() == (width, height) {
            return image.clone();
        }

        trace!(
            "Resizing {}x{} -> {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        imageops::resize(image, width, height, FilterType::Triangle)
    }

    /// Convert then resize in one step
    pub fn prepare(converted: &ConvertedImage, resolution: (u32, u32)) -> Result<RgbImage> {
        let image = Self::to_rgb_image(converted)?;
        Ok(Self::resize(&image, resolution.0, resolution.1))
    }
}
