//! # Split Module
//!
//! Sorts camera frames into per-camera folders.
//!
//! `A12-1689871397000.png` moves to `camera_12/c12_2023_07_20__16_43_17.png`;
//! `A12.png` moves to `camera_12/A12.png` unchanged.

mod executor;
mod planner;
mod types;

pub use executor::SplitExecutor;
pub use planner::{format_timestamp, parse_frame_name, SplitPlanner};
pub use types::*;

use crate::core::scanner::{DirectoryScanner, FrameScanner, ScanConfig};
use crate::error::{ConfigError, CurateError};
use crate::events::EventSender;
use std::path::Path;

/// List, plan and move every frame in `dir`
pub fn split_directory(
    dir: &Path,
    config: &SplitConfig,
    events: &EventSender,
) -> Result<SplitReport, CurateError> {
    if config.extension.trim_start_matches('.').is_empty() {
        return Err(ConfigError::EmptyExtension.into());
    }

    let scanner = DirectoryScanner::new(ScanConfig {
        extension: config.extension.clone(),
        include_hidden: config.include_hidden,
    });
    let frames = scanner.scan_with_events(dir, events)?;

    tracing::info!(dir = %dir.display(), frames = frames.len(), "splitting per camera");
    let plan = SplitPlanner::create_plan(dir, &frames, config.timezone);
    let report = SplitExecutor::execute(plan, config.dry_run, events)?;
    tracing::info!(
        moved = report.moved.len(),
        skipped = report.skipped.len(),
        "split finished"
    );

    Ok(report)
}
