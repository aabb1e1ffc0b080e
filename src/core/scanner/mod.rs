//! # Scanner Module
//!
//! Lists the candidate frames of a source directory.
//!
//! Only files directly inside the directory are considered (sub-folders,
//! including the quarantine and `camera_<id>` folders, are never entered).
//! The result is sorted lexicographically by path, which for camera
//! frames named `<prefix><id>-<millis>` is also chronological per camera.
//!
//! ## Example
//! ```rust,ignore
//! use frame_curator::core::scanner::{DirectoryScanner, FrameScanner, ScanConfig};
//!
//! let scanner = DirectoryScanner::new(ScanConfig::for_extension("png"));
//! let frames = scanner.scan(Path::new("/data/frames"))?;
//! ```

mod filter;
mod walker;

pub use filter::ExtensionFilter;
pub use walker::{DirectoryScanner, ScanConfig};

use crate::error::ScanError;
use crate::events::EventSender;
use std::path::{Path, PathBuf};

/// Trait for frame listers
///
/// Implement this trait to feed the tools from somewhere else (e.g. tests).
pub trait FrameScanner: Send + Sync {
    /// List candidate frames in `dir`, sorted
    fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, ScanError>;

    /// List with progress reporting via events
    fn scan_with_events(&self, dir: &Path, events: &EventSender)
        -> Result<Vec<PathBuf>, ScanError>;
}
