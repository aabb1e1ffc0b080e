//! SIMD-accelerated frame resizing.
//!
//! Uses fast_image_resize, which picks AVX2/NEON code paths when
//! available.

use crate::core::config::FrameSize;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;

/// Reusable resizer; keeps its scratch buffers between frames
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Resize a color frame to exactly `target`, ignoring aspect ratio.
    pub fn resize_rgb(&mut self, image: &RgbImage, target: FrameSize) -> Result<RgbImage, String> {
        if image.width() == 0 || image.height() == 0 {
            return Err("source frame has no pixels".to_string());
        }
        if target.width == 0 || target.height == 0 {
            return Err("target size has no pixels".to_string());
        }

        let src_image = Image::from_vec_u8(
            image.width(),
            image.height(),
            image.as_raw().clone(),
            PixelType::U8x3,
        )
        .map_err(|e| format!("failed to wrap source frame: {}", e))?;

        let mut dst_image = Image::new(target.width, target.height, PixelType::U8x3);

        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| format!("resize failed: {}", e))?;

        RgbImage::from_raw(target.width, target.height, dst_image.into_vec())
            .ok_or_else(|| "resized buffer does not match target size".to_string())
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}
