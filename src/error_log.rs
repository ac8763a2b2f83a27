/// Append-only error log for per-word failures.
///
/// One line per event: `<timestamp> FOR WORD <word>: <cause>`. Writing is
/// best-effort; a log that cannot be written is reported through `tracing`
/// and otherwise ignored.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::warn;

pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record `cause` against `subject`, usually the word being processed.
    pub fn record(&self, subject: &str, cause: &dyn std::fmt::Display) {
        let line = format!(
            "{} FOR WORD {subject}: {cause}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));

        if let Err(e) = written {
            warn!("Failed to write error log {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_lines() {
        let temp = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(temp.path().join("log.txt"));

        log.record("run", &"got status code 404");
        log.record("walk", &"missing expected content: posTabs");

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("FOR WORD run: got status code 404"));
        assert!(lines[1].contains("FOR WORD walk: missing expected content"));
    }

    #[test]
    fn test_unwritable_log_is_ignored() {
        let temp = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let log = ErrorLog::new(temp.path());
        log.record("run", &"boom");
    }
}
