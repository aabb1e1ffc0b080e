//! Where frames go when they leave the candidate list.

use crate::core::preprocess::RejectReason;
use crate::core::relocate::{ensure_dir, move_file};
use crate::error::FilesystemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a frame was quarantined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarantineReason {
    /// Unreadable or too small to compare
    Rejected(RejectReason),
    /// Too little real change compared with a later frame
    NearDuplicate {
        /// The later frame that stays in the list
        of: PathBuf,
        /// Normalized change score of the pair
        score: f64,
    },
}

impl QuarantineReason {
    pub fn is_rejection(&self) -> bool {
        matches!(self, QuarantineReason::Rejected(_))
    }
}

impl fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuarantineReason::Rejected(reason) => write!(f, "rejected: {}", reason),
            QuarantineReason::NearDuplicate { of, score } => {
                write!(f, "near-duplicate of {} (score {:.4})", of.display(), score)
            }
        }
    }
}

/// Destination for frames removed by the sweep.
///
/// Returns where the frame ended up, if it was moved at all.
pub trait Quarantine {
    fn quarantine(
        &mut self,
        path: &Path,
        reason: &QuarantineReason,
    ) -> Result<Option<PathBuf>, FilesystemError>;
}

/// Moves frames into a directory, keeping their file names.
///
/// A later frame with the same name replaces an earlier one.
pub struct DirectoryQuarantine {
    dir: PathBuf,
}

impl DirectoryQuarantine {
    /// Create the quarantine directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, FilesystemError> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }
}

impl Quarantine for DirectoryQuarantine {
    fn quarantine(
        &mut self,
        path: &Path,
        _reason: &QuarantineReason,
    ) -> Result<Option<PathBuf>, FilesystemError> {
        let name = path.file_name().unwrap_or(path.as_os_str());
        let destination = self.dir.join(name);
        move_file(path, &destination)?;
        Ok(Some(destination))
    }
}

/// Records decisions without touching the filesystem (dry runs)
#[derive(Debug, Default)]
pub struct RecordingQuarantine {
    pub recorded: Vec<(PathBuf, QuarantineReason)>,
}

impl RecordingQuarantine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Quarantine for RecordingQuarantine {
    fn quarantine(
        &mut self,
        path: &Path,
        reason: &QuarantineReason,
    ) -> Result<Option<PathBuf>, FilesystemError> {
        self.recorded.push((path.to_path_buf(), reason.clone()));
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn duplicate_of(name: &str) -> QuarantineReason {
        QuarantineReason::NearDuplicate {
            of: PathBuf::from(name),
            score: 0.001,
        }
    }

    #[test]
    fn directory_quarantine_moves_and_keeps_name() {
        let temp = TempDir::new().unwrap();
        let frame = temp.path().join("A1-1.png");
        fs::write(&frame, b"x").unwrap();

        let mut quarantine = DirectoryQuarantine::open(temp.path().join("for_deletion")).unwrap();
        let moved = quarantine
            .quarantine(&frame, &duplicate_of("A1-2.png"))
            .unwrap();

        assert_eq!(moved, Some(temp.path().join("for_deletion").join("A1-1.png")));
        assert!(!frame.exists());
    }

    #[test]
    fn recording_quarantine_leaves_files_alone() {
        let temp = TempDir::new().unwrap();
        let frame = temp.path().join("A1-1.png");
        fs::write(&frame, b"x").unwrap();

        let mut quarantine = RecordingQuarantine::new();
        assert_eq!(
            quarantine.quarantine(&frame, &duplicate_of("A1-2.png")).unwrap(),
            None
        );

        assert!(frame.exists());
        assert_eq!(quarantine.recorded.len(), 1);
    }

    #[test]
    fn reason_display_names_the_kept_frame() {
        let text = duplicate_of("/frames/A1-2.png").to_string();
        assert!(text.contains("near-duplicate"));
        assert!(text.contains("A1-2.png"));
    }
}
