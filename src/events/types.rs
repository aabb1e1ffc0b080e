//! Event type definitions for progress reporting.

use crate::core::sweep::QuarantineReason;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the curator tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Candidate listing events
    Scan(ScanEvent),
    /// Deduplication sweep events
    Sweep(SweepEvent),
    /// Camera splitting events
    Split(SplitEvent),
}

/// Events while listing candidate files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Listing has started
    Started { path: PathBuf },
    /// Listing completed
    Completed { total_files: usize },
}

/// Events during the deduplication sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SweepEvent {
    /// The sweep has started over `total` candidates
    Started { total: usize },
    /// A new outer iteration began
    AnchorVisited {
        /// Number of outer iterations run so far
        position: usize,
        /// Candidates still in the list
        remaining: usize,
    },
    /// A frame left the candidate list
    Quarantined {
        path: PathBuf,
        reason: QuarantineReason,
    },
    /// The sweep finished
    Completed { summary: SweepSummary },
}

/// Events while splitting frames into camera folders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SplitEvent {
    /// Splitting has started
    Started { total: usize },
    /// A frame was moved (or would be, in a dry run)
    Moved { from: PathBuf, to: PathBuf },
    /// A frame name could not be parsed
    Skipped { path: PathBuf, message: String },
    /// Splitting completed
    Completed { moved: usize, skipped: usize },
}

/// Summary of a finished sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Frames listed before the sweep
    pub total_frames: usize,
    /// Frames still in the candidate list
    pub survivors: usize,
    /// Frames quarantined as unreadable or too small
    pub rejected: usize,
    /// Frames quarantined as near-duplicates
    pub near_duplicates: usize,
    /// Pairwise scores computed
    pub comparisons: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
