//! Directory listing implementation using walkdir.

use super::{filter::ExtensionFilter, FrameScanner};
use crate::core::config::DEFAULT_EXTENSION;
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Extension of the frames to list
    pub extension: String,
    /// Whether to include hidden files
    pub include_hidden: bool,
}

impl ScanConfig {
    pub fn for_extension(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            ..Default::default()
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            include_hidden: false,
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct DirectoryScanner {
    filter: ExtensionFilter,
}

impl DirectoryScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = ExtensionFilter::new(&config.extension).with_hidden(config.include_hidden);
        Self { filter }
    }
}

impl FrameScanner for DirectoryScanner {
    fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
        self.scan_with_events(dir, &crate::events::null_sender())
    }

    fn scan_with_events(
        &self,
        dir: &Path,
        events: &EventSender,
    ) -> Result<Vec<PathBuf>, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            path: dir.to_path_buf(),
        }));

        let mut frames = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ScanError::ReadDirectory {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if self.filter.should_include(entry.path()) {
                frames.push(entry.into_path());
            }
        }

        frames.sort();

        tracing::debug!(dir = %dir.display(), count = frames.len(), "listed frames");
        events.send(Event::Scan(ScanEvent::Completed {
            total_files: frames.len(),
        }));

        Ok(frames)
    }
}
