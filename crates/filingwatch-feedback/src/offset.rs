//! Consumer offset file
//!
//! A single base-10 integer followed by a newline: the next stream position
//! to request.

use filingwatch_core::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Offset persisted at a fixed path
#[derive(Debug, Clone)]
pub struct OffsetStore {
    path: PathBuf,
}

impl OffsetStore {
    /// Offset stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the offset file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored offset, 0 when the file is missing, unreadable or negative
    pub fn load(&self) -> i64 {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read offset file, starting at 0");
                return 0;
            }
        };

        match content.trim().parse::<i64>() {
            Ok(offset) if offset >= 0 => offset,
            Ok(offset) => {
                warn!(path = %self.path.display(), offset, "Negative offset, starting at 0");
                0
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt offset file, starting at 0");
                0
            }
        }
    }

    /// Replace the stored offset
    ///
    /// Written to a sibling temp file and renamed over the target, so a crash
    /// leaves either the old or the new value.
    pub fn save(&self, offset: i64) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, format!("{}\n", offset))?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(OffsetStore::new(dir.path().join("feedback_offset.txt")).load(), 0);
    }

    #[test]
    fn test_corrupt_file_is_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback_offset.txt");
        std::fs::write(&path, "twelve\n").unwrap();
        assert_eq!(OffsetStore::new(&path).load(), 0);
    }

    #[test]
    fn test_negative_offset_is_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback_offset.txt");
        for raw in ["-1\n", "-9223372036854775808\n"] {
            std::fs::write(&path, raw).unwrap();
            assert_eq!(OffsetStore::new(&path).load(), 0);
        }
    }

    #[test]
    fn test_save_format_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = OffsetStore::new(dir.path().join("state/feedback_offset.txt"));

        store.save(905).unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "905\n");
        assert_eq!(store.load(), 905);

        store.save(1000).unwrap();
        assert_eq!(store.load(), 1000);
    }
}
