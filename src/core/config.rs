//! Configuration values passed explicitly into preprocessing, scoring and
//! the sweep. Everything is validated once, before any file is touched.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default minimum frame height accepted for comparison
pub const DEFAULT_MIN_HEIGHT: u32 = 480;
/// Default minimum frame width accepted for comparison
pub const DEFAULT_MIN_WIDTH: u32 = 640;
/// Default ratio of changed area below which two frames are duplicates
pub const DEFAULT_THRESHOLD: f64 = 0.025;
/// Default minimum region size, as a fraction of the anchor's pixel count
pub const DEFAULT_MIN_DIFF_AREA: f64 = 0.005;
/// Default name of the quarantine directory inside the source directory
pub const DEFAULT_QUARANTINE_DIR: &str = "for_deletion";
/// Default extension of the frames to process
pub const DEFAULT_EXTENSION: &str = "png";

/// Target size for resizing, height first as on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub height: u32,
    pub width: u32,
}

impl FrameSize {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }
}

/// Percentages of the frame hidden at each edge before comparison.
///
/// Used to ignore fixed overlays such as burned-in timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderMask {
    pub right: u32,
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
}

/// Pixel bounds of the region kept by a [`BorderMask`], half-open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min
    }
}

impl BorderMask {
    /// Mask in command-line order: right, top, left, bottom
    pub fn new(right: u32, top: u32, left: u32, bottom: u32) -> Self {
        Self {
            right,
            top,
            left,
            bottom,
        }
    }

    /// A mask that keeps the whole frame
    pub fn none() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (side, value) in [
            ("right", self.right),
            ("top", self.top),
            ("left", self.left),
            ("bottom", self.bottom),
        ] {
            if value >= 100 {
                return Err(ConfigError::MaskPercentOutOfRange { side, value });
            }
        }
        if self.left + self.right >= 100 {
            return Err(ConfigError::MaskOverlap {
                axis: "width",
                first: self.left,
                second: self.right,
            });
        }
        if self.top + self.bottom >= 100 {
            return Err(ConfigError::MaskOverlap {
                axis: "height",
                first: self.top,
                second: self.bottom,
            });
        }
        Ok(())
    }

    /// Compute the kept region for a `width` x `height` frame.
    ///
    /// Each edge loses `floor(percent * size / 100)` pixels.
    pub fn crop_rect(&self, width: u32, height: u32) -> Result<CropRect, ConfigError> {
        let cut = |percent: u32, size: u32| (u64::from(percent) * u64::from(size) / 100) as u32;

        let x_min = cut(self.left, width);
        let x_max = width.saturating_sub(cut(self.right, width));
        let y_min = cut(self.top, height);
        let y_max = height.saturating_sub(cut(self.bottom, height));

        if x_min >= x_max || y_min >= y_max {
            return Err(ConfigError::EmptyCropRegion {
                width,
                height,
                x_min,
                x_max,
                y_min,
                y_max,
            });
        }

        Ok(CropRect {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

impl Default for BorderMask {
    fn default() -> Self {
        Self::new(5, 10, 5, 0)
    }
}

/// How a single frame is turned into a comparable grayscale grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Resize every frame to this size before masking
    pub resize_to: Option<FrameSize>,
    /// Gaussian blur passes, one per kernel size
    pub blur_radii: Vec<u32>,
    /// Border region to discard
    pub border_mask: BorderMask,
    /// Frames shorter than this are rejected
    pub min_height: u32,
    /// Frames narrower than this are rejected
    pub min_width: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            resize_to: None,
            blur_radii: Vec::new(),
            border_mask: BorderMask::default(),
            min_height: DEFAULT_MIN_HEIGHT,
            min_width: DEFAULT_MIN_WIDTH,
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.resize_to {
            if size.height == 0 || size.width == 0 {
                return Err(ConfigError::InvalidResize {
                    height: size.height,
                    width: size.width,
                });
            }
        }
        if let Some(&radius) = self.blur_radii.iter().find(|r| *r % 2 == 0) {
            return Err(ConfigError::EvenBlurRadius { radius });
        }
        self.border_mask.validate()
    }
}

/// Options for the deduplication sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    pub preprocess: PreprocessConfig,
    /// Normalized change below which two frames count as the same
    pub threshold: f64,
    /// Minimum region area as a fraction of the anchor's pixel count
    pub min_diff_area: f64,
    /// Extension of the frames to consider, without the dot
    pub extension: String,
    /// Name of the quarantine directory created inside the source directory
    pub quarantine_dir: String,
    /// Consider dot-files too
    pub include_hidden: bool,
    /// Decide everything but move nothing
    pub dry_run: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessConfig::default(),
            threshold: DEFAULT_THRESHOLD,
            min_diff_area: DEFAULT_MIN_DIFF_AREA,
            extension: DEFAULT_EXTENSION.to_string(),
            quarantine_dir: DEFAULT_QUARANTINE_DIR.to_string(),
            include_hidden: false,
            dry_run: false,
        }
    }
}

impl DedupConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: self.threshold,
            });
        }
        if !(0.0..=1.0).contains(&self.min_diff_area) {
            return Err(ConfigError::MinDiffAreaOutOfRange {
                value: self.min_diff_area,
            });
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        self.preprocess.validate()
    }
}
