//! File filtering logic for the scanner.

use std::path::Path;

/// Accepts files with one extension, optionally skipping dot-files
pub struct ExtensionFilter {
    /// Lowercased extension, without the dot
    extension: String,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ExtensionFilter {
    /// Create a filter for `extension` (a leading dot is ignored)
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_lowercase(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase() == self.extension)
            .unwrap_or(false)
    }
}
