//! # Sweep Module
//!
//! Removes near-duplicate frames from a sorted directory listing.
//!
//! ## How It Works
//! The frame at the anchor position is compared with every later frame.
//! If some later frame shows less change than the threshold, the anchor
//! is quarantined and the position is visited again with the next frame
//! as anchor; otherwise the anchor is kept and the position advances.
//! Frames that cannot be preprocessed are quarantined wherever they are
//! met, and the sweep carries on as if they had never been listed.
//!
//! Every pair of survivors has been compared once, so sweeping the
//! survivors again removes nothing.

mod executor;
mod quarantine;

pub use executor::{DedupSweep, QuarantinedFrame, SweepReport};
pub use quarantine::{DirectoryQuarantine, Quarantine, QuarantineReason, RecordingQuarantine};

use crate::core::config::DedupConfig;
use crate::core::scanner::{DirectoryScanner, FrameScanner, ScanConfig};
use crate::error::CurateError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result of sweeping one directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupReport {
    /// Where quarantined frames were (or would have been) moved
    pub quarantine_dir: PathBuf,
    pub dry_run: bool,
    pub sweep: SweepReport,
}

/// Sweep every frame in `dir`, moving rejects into its quarantine folder.
///
/// The configuration is checked before the directory is read.
pub fn dedup_directory(
    dir: &Path,
    config: &DedupConfig,
    events: &EventSender,
) -> Result<DedupReport, CurateError> {
    let mut sweep = DedupSweep::from_config(config)?;

    let scanner = DirectoryScanner::new(ScanConfig {
        extension: config.extension.clone(),
        include_hidden: config.include_hidden,
    });
    let frames = scanner.scan_with_events(dir, events)?;
    let quarantine_dir = dir.join(&config.quarantine_dir);

    let sweep = if config.dry_run {
        let mut quarantine = RecordingQuarantine::new();
        sweep.run_with_events(frames, &mut quarantine, events)?
    } else {
        let mut quarantine = DirectoryQuarantine::open(&quarantine_dir)?;
        sweep.run_with_events(frames, &mut quarantine, events)?
    };

    Ok(DedupReport {
        quarantine_dir,
        dry_run: config.dry_run,
        sweep,
    })
}
