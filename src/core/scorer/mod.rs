//! # Scorer Module
//!
//! Measures how much real change separates two preprocessed frames.
//!
//! ## How It Works
//! 1. Absolute per-pixel difference of the two grids
//! 2. Binarize: a difference above 45 marks a changed pixel
//! 3. Dilate the mask twice with a 3x3 square to merge nearby changes
//! 4. Label the 8-connected regions of the dilated mask
//! 5. Sum the areas of regions at least `min_region_area` pixels large
//!
//! Small isolated regions (sensor noise, compression artefacts) never
//! reach the sum, so the score reflects objects that moved or appeared.

use crate::core::preprocess::PreprocessedImage;
use crate::error::CompareError;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use imageproc::region_labelling::{connected_components, Connectivity};
use serde::{Deserialize, Serialize};

/// Pixel difference above which a pixel counts as changed
pub const DIFF_THRESHOLD: u8 = 45;
/// Number of 3x3 dilation passes applied to the change mask
pub const DILATE_ITERATIONS: usize = 2;

const CHANGED: u8 = 255;

/// A connected region of changed pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceRegion {
    /// Number of pixels in the region
    pub area: u64,
    /// Bounding box, inclusive
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

/// Outcome of comparing two frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeScore {
    /// Sum of the areas of the qualifying regions
    pub raw_score: u64,
    /// Regions at least `min_region_area` large, in label order
    pub regions: Vec<DifferenceRegion>,
}

impl ChangeScore {
    /// `raw_score` as a fraction of `pixel_count`
    pub fn normalized(&self, pixel_count: u64) -> f64 {
        if pixel_count == 0 {
            return 0.0;
        }
        self.raw_score as f64 / pixel_count as f64
    }
}

/// Change-detection scorer with fixed threshold and dilation
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeScorer;

impl ChangeScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score the change between `a` and `b`.
    ///
    /// Both frames must have the same dimensions.
    pub fn score(
        &self,
        a: &PreprocessedImage,
        b: &PreprocessedImage,
        min_region_area: u64,
    ) -> Result<ChangeScore, CompareError> {
        if a.width() != b.width() || a.height() != b.height() {
            return Err(CompareError::DimensionMismatch {
                left_width: a.width(),
                left_height: a.height(),
                right_width: b.width(),
                right_height: b.height(),
            });
        }

        let mask = change_mask(a.as_gray(), b.as_gray());
        let dilated = (0..DILATE_ITERATIONS).fold(mask, |m, _| dilate(&m, Norm::LInf, 1));
        let mut regions = label_regions(&dilated);

        regions.retain(|r| r.area >= min_region_area);
        let raw_score = regions.iter().map(|r| r.area).sum();

        Ok(ChangeScore { raw_score, regions })
    }
}

/// Binary mask of pixels whose absolute difference exceeds the threshold
fn change_mask(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let mut mask = GrayImage::new(a.width(), a.height());
    for ((out, pa), pb) in mask.pixels_mut().zip(a.pixels()).zip(b.pixels()) {
        if pa.0[0].abs_diff(pb.0[0]) > DIFF_THRESHOLD {
            *out = Luma([CHANGED]);
        }
    }
    mask
}

fn label_regions(mask: &GrayImage) -> Vec<DifferenceRegion> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut regions: Vec<DifferenceRegion> = Vec::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label.0[0] as usize;
        if label == 0 {
            continue;
        }
        // Labels are dense and start at 1.
        if regions.len() < label {
            regions.resize(
                label,
                DifferenceRegion {
                    area: 0,
                    x_min: u32::MAX,
                    y_min: u32::MAX,
                    x_max: 0,
                    y_max: 0,
                },
            );
        }
        let region = &mut regions[label - 1];
        region.area += 1;
        region.x_min = region.x_min.min(x);
        region.y_min = region.y_min.min(y);
        region.x_max = region.x_max.max(x);
        region.y_max = region.y_max.max(y);
    }

    regions.retain(|r| r.area > 0);
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PreprocessedImage {
        PreprocessedImage::from_gray(GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)])))
    }

    fn textured(width: u32, height: u32) -> PreprocessedImage {
        frame(width, height, |x, y| ((x * 7 + y * 13) % 40) as u8 + 60)
    }

    /// Same texture with a solid `w` x `h` block at (`x0`, `y0`) painted white
    fn with_block(width: u32, height: u32, x0: u32, y0: u32, w: u32, h: u32) -> PreprocessedImage {
        frame(width, height, |x, y| {
            if x >= x0 && x < x0 + w && y >= y0 && y < y0 + h {
                255
            } else {
                ((x * 7 + y * 13) % 40) as u8 + 60
            }
        })
    }

    #[test]
    fn identical_frames_score_zero() {
        let scorer = ChangeScorer::new();
        let a = textured(120, 90);

        for min_area in [0, 1, 100, u64::MAX] {
            let score = scorer.score(&a, &a.clone(), min_area).unwrap();
            assert_eq!(score.raw_score, 0);
            assert!(score.regions.is_empty());
        }
    }

    #[test]
    fn single_block_scores_its_dilated_area() {
        let scorer = ChangeScorer::new();
        let a = textured(100, 80);
        let b = with_block(100, 80, 30, 20, 20, 10);

        let score = scorer.score(&a, &b, 1).unwrap();

        // Two 3x3 dilations grow each side by two pixels.
        assert_eq!(score.raw_score, (20 + 4) * (10 + 4));
        assert_eq!(score.regions.len(), 1);
        let region = &score.regions[0];
        assert_eq!((region.x_min, region.y_min), (28, 18));
        assert_eq!((region.x_max, region.y_max), (51, 31));
    }

    #[test]
    fn block_below_min_area_is_ignored() {
        let scorer = ChangeScorer::new();
        let a = textured(100, 80);
        let b = with_block(100, 80, 30, 20, 20, 10);
        let dilated_area = 24 * 14;

        assert_eq!(scorer.score(&a, &b, dilated_area).unwrap().raw_score, dilated_area);
        assert_eq!(scorer.score(&a, &b, dilated_area + 1).unwrap().raw_score, 0);
    }

    #[test]
    fn small_differences_are_below_threshold() {
        let scorer = ChangeScorer::new();
        let a = frame(50, 50, |_, _| 100);
        let b = frame(50, 50, |_, _| 100 + DIFF_THRESHOLD);

        assert_eq!(scorer.score(&a, &b, 0).unwrap().raw_score, 0);

        let c = frame(50, 50, |_, _| 100 + DIFF_THRESHOLD + 1);
        assert_eq!(scorer.score(&a, &c, 0).unwrap().raw_score, 2500);
    }

    #[test]
    fn nearby_changes_merge_into_one_region() {
        let scorer = ChangeScorer::new();
        let a = frame(60, 60, |_, _| 0);
        // Two single pixels three apart join after dilation.
        let b = frame(60, 60, |x, y| if y == 30 && (x == 20 || x == 23) { 255 } else { 0 });

        let score = scorer.score(&a, &b, 0).unwrap();
        assert_eq!(score.regions.len(), 1);
    }

    #[test]
    fn separate_regions_are_filtered_individually() {
        let scorer = ChangeScorer::new();
        let a = frame(100, 100, |_, _| 0);
        let b = frame(100, 100, |x, y| {
            let big = (10..30).contains(&x) && (10..30).contains(&y);
            let small = x == 80 && y == 80;
            if big || small {
                255
            } else {
                0
            }
        });

        let all = scorer.score(&a, &b, 0).unwrap();
        assert_eq!(all.regions.len(), 2);
        assert_eq!(all.raw_score, 24 * 24 + 5 * 5);

        let big_only = scorer.score(&a, &b, 30).unwrap();
        assert_eq!(big_only.regions.len(), 1);
        assert_eq!(big_only.raw_score, 24 * 24);
    }

    #[test]
    fn normalized_score_shrinks_with_changed_area() {
        let scorer = ChangeScorer::new();
        let a = textured(200, 150);
        let pixels = a.pixel_count();

        let mut previous = f64::INFINITY;
        for side in [60, 40, 20, 10] {
            let b = with_block(200, 150, 50, 40, side, side);
            let ratio = scorer.score(&a, &b, 1).unwrap().normalized(pixels);
            assert!(ratio < previous, "{} not below {}", ratio, previous);
            previous = ratio;
        }
    }

    #[test]
    fn mismatched_dimensions_are_an_error() {
        let scorer = ChangeScorer::new();
        let err = scorer
            .score(&textured(64, 48), &textured(48, 64), 0)
            .unwrap_err();

        assert!(matches!(err, CompareError::DimensionMismatch { .. }));
    }
}
