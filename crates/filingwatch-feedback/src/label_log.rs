//! Append-only label log
//!
//! One JSON object per line, never rewritten. The set of update ids already
//! processed is rebuilt from the log on every run, which is what makes row
//! production exactly-once even when the offset file lags behind.

use filingwatch_core::{FeedbackRow, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Only the id is needed to rebuild the de-duplication set
#[derive(Deserialize)]
struct UpdateIdOnly {
    update_id: Option<i64>,
}

/// JSON-lines feedback log at a fixed path
#[derive(Debug, Clone)]
pub struct LabelLog {
    path: PathBuf,
}

impl LabelLog {
    /// Log stored at `path`; the file is created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Update ids of every row in the log
    ///
    /// A missing or unreadable log yields an empty set; malformed lines are
    /// skipped.
    pub fn seen_update_ids(&self) -> HashSet<i64> {
        let mut seen = HashSet::new();

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return seen,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read label log, starting empty");
                return seen;
            }
        };

        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Stopped reading label log");
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<UpdateIdOnly>(line) {
                Ok(UpdateIdOnly {
                    update_id: Some(id),
                }) => {
                    seen.insert(id);
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(line = line_no + 1, error = %e, "Skipping malformed label log line");
                }
            }
        }

        seen
    }

    /// Every well-formed row, in append order
    pub fn read_rows(&self) -> Result<Vec<FeedbackRow>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut rows = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<FeedbackRow>(line) {
                Ok(row) => rows.push(row),
                Err(e) => debug!(error = %e, "Skipping unreadable feedback row"),
            }
        }

        Ok(rows)
    }

    /// Append rows in order and sync them to disk
    ///
    /// Any failure is returned: losing an append silently would let the
    /// offset move past rows that were never recorded.
    pub fn append(&self, rows: &[FeedbackRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        for row in rows {
            let json = serde_json::to_string(row)?;
            writer.write_all(json.as_bytes())?;
            writer.write_all(b"\n")?;
        }

        writer.flush()?;
        writer.get_ref().sync_all()?;

        debug!(path = %self.path.display(), rows = rows.len(), "Appended feedback rows");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use filingwatch_core::EventType;
    use tempfile::TempDir;

    fn row(update_id: i64) -> FeedbackRow {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        FeedbackRow::confirmed(update_id, "0001193125-24-000123", EventType::PrefCall, at)
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = TempDir::new().unwrap();
        let log = LabelLog::new(dir.path().join("feedback_labels.jsonl"));

        assert!(log.seen_update_ids().is_empty());
        assert!(log.read_rows().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_read_back() {
        let dir = TempDir::new().unwrap();
        let log = LabelLog::new(dir.path().join("nested/feedback_labels.jsonl"));

        log.append(&[row(10), row(11)]).unwrap();
        log.append(&[row(12)]).unwrap();

        let rows = log.read_rows().unwrap();
        assert_eq!(rows.iter().map(|r| r.update_id).collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(log.seen_update_ids(), HashSet::from([10, 11, 12]));
    }

    #[test]
    fn test_one_object_per_line() {
        let dir = TempDir::new().unwrap();
        let log = LabelLog::new(dir.path().join("feedback_labels.jsonl"));
        log.append(&[row(1), row(2)]).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(content.ends_with('\n'));
        assert!(lines[0].starts_with('{') && lines[0].ends_with('}'));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback_labels.jsonl");
        std::fs::write(
            &path,
            "{\"update_id\": 5}\nnot json\n\n{\"accession_number\": \"x\"}\n{\"update_id\": \"7\"}\n{\"update_id\": 8}\n",
        )
        .unwrap();

        let log = LabelLog::new(&path);
        assert_eq!(log.seen_update_ids(), HashSet::from([5, 8]));
    }

    #[test]
    fn test_empty_append_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let log = LabelLog::new(dir.path().join("feedback_labels.jsonl"));
        log.append(&[]).unwrap();
        assert!(!log.path().exists());
    }

    #[test]
    fn test_append_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // The log path is a directory, so opening it for append must fail
        let log = LabelLog::new(dir.path());
        assert!(log.append(&[row(1)]).is_err());
    }
}
