//! Plan generator: parses camera frame names into destinations.
//!
//! Frame names look like `<prefix><id>[-<millis>].<ext>`, e.g.
//! `A12-1689871397000.png` from camera 12.

use super::types::*;
use crate::error::FrameNameError;
use chrono::{DateTime, Local, Utc};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y_%m_%d__%H_%M_%S";

/// Parse a frame's file stem.
///
/// The camera id is the first `-`/`_` separated segment minus its
/// one-character prefix. A timestamp is present only when the stem has
/// exactly one `-`.
pub fn parse_frame_name(stem: &str) -> Result<FrameName, FrameNameError> {
    let head = stem.split(['-', '_']).next().unwrap_or("");
    let camera_id: String = head.chars().skip(1).collect();
    if camera_id.is_empty() {
        return Err(FrameNameError::MissingCameraId {
            stem: stem.to_string(),
        });
    }

    let parts: Vec<&str> = stem.split('-').collect();
    let timestamp_ms = match parts.as_slice() {
        [_, millis] => Some(millis.parse::<i64>().map_err(|_| {
            FrameNameError::InvalidTimestamp {
                stem: stem.to_string(),
                value: millis.to_string(),
            }
        })?),
        _ => None,
    };

    Ok(FrameName {
        camera_id,
        timestamp_ms,
    })
}

/// Render epoch milliseconds as `YYYY_MM_DD__HH_MM_SS`
pub fn format_timestamp(millis: i64, timezone: TimeZoneMode) -> Option<String> {
    let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
    let formatted = match timezone {
        TimeZoneMode::Utc => utc.format(TIMESTAMP_FORMAT).to_string(),
        TimeZoneMode::Local => utc.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
    };
    Some(formatted)
}

/// Generates split plans
pub struct SplitPlanner;

impl SplitPlanner {
    /// Folder for one camera inside the source directory
    pub fn camera_dir(root: &Path, camera_id: &str) -> PathBuf {
        root.join(format!("camera_{}", camera_id))
    }

    /// Where `path` goes, or why it cannot be placed
    pub fn plan_frame(
        root: &Path,
        path: &Path,
        timezone: TimeZoneMode,
    ) -> Result<PlannedMove, FrameNameError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let frame = parse_frame_name(&stem)?;

        let file_name = match frame.timestamp_ms {
            Some(millis) => {
                let stamp = format_timestamp(millis, timezone).ok_or_else(|| {
                    FrameNameError::InvalidTimestamp {
                        stem: stem.clone(),
                        value: millis.to_string(),
                    }
                })?;
                let suffix = path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                format!("c{}_{}{}", frame.camera_id, stamp, suffix)
            }
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(stem),
        };

        Ok(PlannedMove {
            source: path.to_path_buf(),
            destination: Self::camera_dir(root, &frame.camera_id).join(file_name),
            camera_id: frame.camera_id,
        })
    }

    /// Plan every frame; unparsable names are skipped, not fatal
    pub fn create_plan(root: &Path, frames: &[PathBuf], timezone: TimeZoneMode) -> SplitPlan {
        let mut moves = Vec::new();
        let mut skipped = Vec::new();

        for path in frames {
            match Self::plan_frame(root, path, timezone) {
                Ok(planned) => moves.push(planned),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                    skipped.push(SkippedFrame {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        SplitPlan { moves, skipped }
    }
}
