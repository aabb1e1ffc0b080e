//! Types for the split module.

use crate::core::config::DEFAULT_EXTENSION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Clock used to render embedded timestamps
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeZoneMode {
    /// Coordinated Universal Time
    #[default]
    Utc,
    /// The machine's local time zone
    Local,
}

/// Configuration for a split run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub extension: String,
    pub include_hidden: bool,
    pub timezone: TimeZoneMode,
    /// Plan and report without moving anything
    pub dry_run: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            include_hidden: false,
            timezone: TimeZoneMode::Utc,
            dry_run: false,
        }
    }
}

/// What a frame's file name says about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameName {
    pub camera_id: String,
    /// Milliseconds since the Unix epoch, when embedded in the name
    pub timestamp_ms: Option<i64>,
}

/// One frame and where it goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub camera_id: String,
}

/// A frame left in place because its name could not be parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFrame {
    pub path: PathBuf,
    pub message: String,
}

/// The moves a split run will perform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitPlan {
    pub moves: Vec<PlannedMove>,
    pub skipped: Vec<SkippedFrame>,
}

/// Result of executing a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub moved: Vec<PlannedMove>,
    pub skipped: Vec<SkippedFrame>,
    pub folders_created: usize,
    pub dry_run: bool,
    pub duration_ms: u64,
}
