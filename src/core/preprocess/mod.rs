//! # Preprocess Module
//!
//! Turns a frame on disk into a grayscale grid ready for change scoring.
//!
//! ## Steps
//! 1. Decode as a color image
//! 2. Reject frames below the minimum resolution
//! 3. Resize to the configured size, if any
//! 4. Convert to grayscale with BT.601 weights
//! 5. Crop away the border mask
//! 6. Apply each Gaussian blur pass in order, one kernel of exactly the
//!    configured (odd) size per pass
//!
//! A frame that cannot be used is not an error: it comes back as
//! [`PreprocessOutcome::Rejected`]. Only an unusable configuration (a mask
//! that leaves nothing) is reported as `Err`.

mod decode;
mod resize;

pub use decode::FrameDecoder;
pub use resize::FastResizer;

use crate::core::config::PreprocessConfig;
use crate::error::ConfigError;
use image::{imageops, DynamicImage, GrayImage, Luma, Rgb};
use imageproc::filter::separable_filter_equal;
use imageproc::map::map_colors;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A single-channel frame after masking and blurring
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedImage {
    gray: GrayImage,
}

impl PreprocessedImage {
    /// Wrap an already prepared grayscale grid
    pub fn from_gray(gray: GrayImage) -> Self {
        Self { gray }
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    /// Height times width
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.gray
    }
}

/// Why a frame cannot take part in comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// The file could not be read or decoded
    Unreadable { reason: String },
    /// The decoded frame is smaller than the configured minimum
    BelowMinimumResolution {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Unreadable { reason } => write!(f, "unreadable ({})", reason),
            RejectReason::BelowMinimumResolution {
                width,
                height,
                min_width,
                min_height,
            } => write!(
                f,
                "{}x{} is below the minimum {}x{}",
                width, height, min_width, min_height
            ),
        }
    }
}

/// Result of preprocessing one frame
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessOutcome {
    Ready(PreprocessedImage),
    Rejected(RejectReason),
}

/// Source of preprocessed frames for the sweep.
///
/// Implemented by [`Preprocessor`]; tests substitute in-memory frames.
pub trait FrameLoader {
    fn load(&mut self, path: &Path) -> Result<PreprocessOutcome, ConfigError>;
}

/// OpenCV's rule for deriving sigma from a kernel size when none is given
fn sigma_for_kernel(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian of exactly `kernel_size` taps.
///
/// Sizes up to 7 use OpenCV's fixed binomial-like tables; larger sizes are
/// sampled from the Gaussian with sigma from [`sigma_for_kernel`].
fn gaussian_kernel(kernel_size: u32) -> Vec<f32> {
    match kernel_size {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {
            let sigma = sigma_for_kernel(kernel_size);
            let center = (kernel_size / 2) as f32;
            let taps: Vec<f32> = (0..kernel_size)
                .map(|i| {
                    let d = i as f32 - center;
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                })
                .collect();
            let sum: f32 = taps.iter().sum();
            taps.into_iter().map(|t| t / sum).collect()
        }
    }
}

/// ITU-R BT.601 luma in OpenCV's 14-bit fixed point, rounded
fn bt601_luma(Rgb([r, g, b]): Rgb<u8>) -> Luma<u8> {
    let y = u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + (1 << 13);
    Luma([(y >> 14) as u8])
}

/// Preprocesses frames according to one [`PreprocessConfig`]
pub struct Preprocessor {
    config: PreprocessConfig,
    resizer: FastResizer,
}

impl Preprocessor {
    /// Validate `config` and build a preprocessor for it
    pub fn new(config: PreprocessConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            resizer: FastResizer::new(),
        })
    }

    /// Decode and preprocess the frame at `path`
    pub fn preprocess_path(&mut self, path: &Path) -> Result<PreprocessOutcome, ConfigError> {
        match FrameDecoder::decode(path) {
            Ok(image) => self.preprocess_image(&image),
            Err(e) => Ok(PreprocessOutcome::Rejected(RejectReason::Unreadable {
                reason: e.to_string(),
            })),
        }
    }

    /// Preprocess an already decoded frame
    pub fn preprocess_image(
        &mut self,
        image: &DynamicImage,
    ) -> Result<PreprocessOutcome, ConfigError> {
        let (width, height) = (image.width(), image.height());
        if height < self.config.min_height || width < self.config.min_width {
            return Ok(PreprocessOutcome::Rejected(
                RejectReason::BelowMinimumResolution {
                    width,
                    height,
                    min_width: self.config.min_width,
                    min_height: self.config.min_height,
                },
            ));
        }

        let mut rgb = image.to_rgb8();
        if let Some(target) = self.config.resize_to {
            if target.width != width || target.height != height {
                rgb = match self.resizer.resize_rgb(&rgb, target) {
                    Ok(resized) => resized,
                    Err(reason) => {
                        return Ok(PreprocessOutcome::Rejected(RejectReason::Unreadable {
                            reason,
                        }))
                    }
                };
            }
        }

        let gray: GrayImage = map_colors(&rgb, bt601_luma);

        let rect = self
            .config
            .border_mask
            .crop_rect(gray.width(), gray.height())?;
        let mut gray =
            imageops::crop_imm(&gray, rect.x_min, rect.y_min, rect.width(), rect.height())
                .to_image();

        for &kernel_size in &self.config.blur_radii {
            // A 1x1 kernel leaves the frame unchanged.
            if kernel_size > 1 {
                gray = separable_filter_equal(&gray, &gaussian_kernel(kernel_size));
            }
        }

        Ok(PreprocessOutcome::Ready(PreprocessedImage::from_gray(gray)))
    }
}

impl FrameLoader for Preprocessor {
    fn load(&mut self, path: &Path) -> Result<PreprocessOutcome, ConfigError> {
        self.preprocess_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{BorderMask, FrameSize};
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value; 3])))
    }

    fn ready(outcome: PreprocessOutcome) -> PreprocessedImage {
        match outcome {
            PreprocessOutcome::Ready(image) => image,
            PreprocessOutcome::Rejected(reason) => panic!("unexpected rejection: {}", reason),
        }
    }

    #[test]
    fn small_frame_is_rejected_not_failed() {
        let mut pre = Preprocessor::new(PreprocessConfig::default()).unwrap();
        let outcome = pre.preprocess_image(&solid(320, 240, 0)).unwrap();

        assert_eq!(
            outcome,
            PreprocessOutcome::Rejected(RejectReason::BelowMinimumResolution {
                width: 320,
                height: 240,
                min_width: 640,
                min_height: 480,
            })
        );
    }

    #[test]
    fn minimum_check_uses_original_size_before_resize() {
        let config = PreprocessConfig {
            resize_to: Some(FrameSize::new(480, 640)),
            ..Default::default()
        };
        let mut pre = Preprocessor::new(config).unwrap();

        let outcome = pre.preprocess_image(&solid(639, 480, 0)).unwrap();
        assert!(matches!(outcome, PreprocessOutcome::Rejected(_)));
    }

    #[test]
    fn default_mask_crops_expected_region() {
        let mut pre = Preprocessor::new(PreprocessConfig::default()).unwrap();
        let image = ready(pre.preprocess_image(&solid(640, 480, 90)).unwrap());

        // 640 - 32 - 32 wide, 480 - 48 - 0 high
        assert_eq!(image.width(), 576);
        assert_eq!(image.height(), 432);
        assert_eq!(image.pixel_count(), 576 * 432);
    }

    #[test]
    fn mask_is_applied_after_resize() {
        let config = PreprocessConfig {
            resize_to: Some(FrameSize::new(500, 1000)),
            border_mask: BorderMask::new(10, 10, 10, 10),
            ..Default::default()
        };
        let mut pre = Preprocessor::new(config).unwrap();
        let image = ready(pre.preprocess_image(&solid(1280, 720, 50)).unwrap());

        assert_eq!((image.width(), image.height()), (800, 400));
    }

    #[test]
    fn crop_keeps_the_inner_pixels() {
        let config = PreprocessConfig {
            border_mask: BorderMask::new(0, 50, 50, 0),
            min_height: 1,
            min_width: 1,
            ..Default::default()
        };
        let mut pre = Preprocessor::new(config).unwrap();

        // Bright only in the bottom-right quadrant
        let frame = RgbImage::from_fn(20, 10, |x, y| {
            if x >= 10 && y >= 5 {
                Rgb([255; 3])
            } else {
                Rgb([0; 3])
            }
        });
        let image = ready(pre.preprocess_image(&DynamicImage::ImageRgb8(frame)).unwrap());

        assert_eq!((image.width(), image.height()), (10, 5));
        assert!(image.as_gray().pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn blur_keeps_dimensions_and_smooths_edges() {
        let config = PreprocessConfig {
            blur_radii: vec![5, 3],
            border_mask: BorderMask::none(),
            min_height: 1,
            min_width: 1,
            ..Default::default()
        };
        let mut pre = Preprocessor::new(config).unwrap();

        let frame = RgbImage::from_fn(40, 40, |x, _| if x < 20 { Rgb([0; 3]) } else { Rgb([255; 3]) });
        let image = ready(pre.preprocess_image(&DynamicImage::ImageRgb8(frame)).unwrap());

        assert_eq!((image.width(), image.height()), (40, 40));
        let edge = image.as_gray().get_pixel(20, 20).0[0];
        assert!(edge > 0 && edge < 255, "edge pixel {} was not smoothed", edge);
    }

    #[test]
    fn unreadable_file_is_rejected() {
        let mut pre = Preprocessor::new(PreprocessConfig::default()).unwrap();
        let outcome = pre
            .preprocess_path(Path::new("/nonexistent/frame.png"))
            .unwrap();

        assert!(matches!(
            outcome,
            PreprocessOutcome::Rejected(RejectReason::Unreadable { .. })
        ));
    }

    #[test]
    fn invalid_config_is_refused_up_front() {
        let config = PreprocessConfig {
            blur_radii: vec![2],
            ..Default::default()
        };
        assert!(Preprocessor::new(config).is_err());
    }

    #[test]
    fn grayscale_uses_bt601_weights() {
        let config = PreprocessConfig {
            border_mask: BorderMask::none(),
            min_height: 1,
            min_width: 1,
            ..Default::default()
        };
        let mut pre = Preprocessor::new(config).unwrap();

        let gray_of = |pre: &mut Preprocessor, color: [u8; 3]| {
            let frame = RgbImage::from_pixel(2, 2, Rgb(color));
            let image = ready(pre.preprocess_image(&DynamicImage::ImageRgb8(frame)).unwrap());
            image.as_gray().get_pixel(0, 0).0[0]
        };

        assert_eq!(gray_of(&mut pre, [200, 0, 0]), 60);
        assert_eq!(gray_of(&mut pre, [0, 200, 0]), 117);
        assert_eq!(gray_of(&mut pre, [0, 0, 200]), 23);
        assert_eq!(gray_of(&mut pre, [255, 255, 255]), 255);
    }

    #[test]
    fn red_object_on_black_counts_as_change() {
        let mut pre = Preprocessor::new(PreprocessConfig::default()).unwrap();
        let background = ready(pre.preprocess_image(&solid(640, 480, 0)).unwrap());
        let frame = RgbImage::from_fn(640, 480, |x, y| {
            if (220..420).contains(&x) && (140..340).contains(&y) {
                Rgb([200, 0, 0])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let with_object = ready(pre.preprocess_image(&DynamicImage::ImageRgb8(frame)).unwrap());

        let min_area = (background.pixel_count() as f64 * 0.005).floor() as u64;
        let change = crate::core::scorer::ChangeScorer::new()
            .score(&background, &with_object, min_area)
            .unwrap();

        assert!(change.normalized(background.pixel_count()) > 0.025);
    }

    #[test]
    fn blur_support_matches_kernel_size() {
        let config = PreprocessConfig {
            blur_radii: vec![3],
            border_mask: BorderMask::none(),
            min_height: 1,
            min_width: 1,
            ..Default::default()
        };
        let mut pre = Preprocessor::new(config).unwrap();

        let frame = RgbImage::from_fn(9, 9, |x, y| {
            if x == 4 && y == 4 {
                Rgb([255; 3])
            } else {
                Rgb([0; 3])
            }
        });
        let image = ready(pre.preprocess_image(&DynamicImage::ImageRgb8(frame)).unwrap());
        let gray = image.as_gray();

        assert!(gray.get_pixel(5, 4).0[0] > 0);
        assert!(gray.get_pixel(5, 5).0[0] > 0);
        assert_eq!(gray.get_pixel(6, 4).0[0], 0);
        assert_eq!(gray.get_pixel(4, 2).0[0], 0);
    }

    #[test]
    fn kernels_have_requested_length_and_unit_sum() {
        for size in [1, 3, 5, 7, 9, 15] {
            let kernel = gaussian_kernel(size);
            assert_eq!(kernel.len(), size as usize);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "kernel {} sums to {}", size, sum);
        }
    }

    #[test]
    fn sigma_follows_kernel_size() {
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-6);
        assert!((sigma_for_kernel(5) - 1.1).abs() < 1e-6);
    }
}
