//! Moving frames between directories.
//!
//! A move is the only irreversible side effect of either tool, and each
//! file is moved on its own: there is no batching and no rollback.

use crate::error::FilesystemError;
use std::fs;
use std::io;
use std::path::Path;

/// Create `dir` (and parents) if it does not exist yet.
///
/// Returns `true` when the directory was created by this call.
pub fn ensure_dir(dir: &Path) -> Result<bool, FilesystemError> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|e| FilesystemError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}

/// Move `from` to `to`, replacing any file already at `to`.
///
/// Tries a rename first; across filesystems falls back to copy, size
/// check, then delete of the source.
pub fn move_file(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    fs::rename(from, to)
        .or_else(|_| copy_then_remove(from, to))
        .map_err(|e| FilesystemError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let source_size = fs::metadata(from)?.len();
    fs::copy(from, to)?;

    let dest_size = fs::metadata(to)?.len();
    if dest_size != source_size {
        let _ = fs::remove_file(to);
        return Err(io::Error::other(format!(
            "copy verification failed: source {} bytes, dest {} bytes",
            source_size, dest_size
        )));
    }

    fs::remove_file(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(path: &Path, content: &[u8]) {
        fs::File::create(path).unwrap().write_all(content).unwrap();
    }

    #[test]
    fn move_file_relocates_content() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("A1.png");
        let dst_dir = temp.path().join("for_deletion");
        fs::create_dir(&dst_dir).unwrap();
        write(&src, b"frame");

        move_file(&src, &dst_dir.join("A1.png")).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(dst_dir.join("A1.png")).unwrap(), b"frame");
    }

    #[test]
    fn move_file_overwrites_existing_destination() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("A1.png");
        let dst = temp.path().join("moved.png");
        write(&src, b"newer");
        write(&dst, b"older");

        move_file(&src, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"newer");
    }

    #[test]
    fn move_missing_source_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = move_file(&temp.path().join("gone.png"), &temp.path().join("x.png"))
            .unwrap_err();

        assert!(matches!(err, FilesystemError::Move { .. }));
    }

    #[test]
    fn ensure_dir_reports_creation_once() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("camera_12");

        assert!(ensure_dir(&dir).unwrap());
        assert!(!ensure_dir(&dir).unwrap());
        assert!(dir.is_dir());
    }
}
