/// Work queue backed by a plain text file of pending words.
///
/// One word or phrase per line; lines starting with the comment marker are
/// skipped. Consumed lines can be stripped from the file in place so the
/// next run picks up where this one stopped.
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Errors raised while reading or rewriting the work source.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("work source {path} is empty")]
    EmptySource { path: PathBuf },

    #[error("work source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct WorkQueue {
    path: PathBuf,
    comment_marker: String,
    max_word_len: usize,
    delete: bool,
}

impl WorkQueue {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            comment_marker: "#".to_string(),
            max_word_len: usize::MAX,
            delete: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.words_file)
            .with_comment_marker(&config.comment_marker)
            .with_max_word_len(config.max_word_len)
            .with_delete(config.delete_consumed)
    }

    #[must_use]
    pub fn with_comment_marker(mut self, marker: &str) -> Self {
        self.comment_marker = marker.to_string();
        self
    }

    #[must_use]
    pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
        self.max_word_len = max_word_len;
        self
    }

    #[must_use]
    pub fn with_delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pops up to `max_count` words from the top of the source, in file order.
    ///
    /// Comment and blank lines are skipped. With `delete` set, every line up
    /// to and including the last one scanned is removed from the file; later
    /// lines are written back untouched. Words longer than `max_word_len`
    /// characters are consumed but not returned.
    pub fn take(&self, max_count: usize) -> Result<Vec<String>, QueueError> {
        let data = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;

        let lines: Vec<&str> = data.split_inclusive('\n').collect();
        if lines.is_empty() {
            return Err(QueueError::EmptySource {
                path: self.path.clone(),
            });
        }

        let mut words = Vec::new();
        let mut scanned = 0;
        while words.len() < max_count && scanned < lines.len() {
            let line = lines[scanned];
            scanned += 1;

            if line.starts_with(self.comment_marker.as_str()) {
                continue;
            }
            let word = line.trim();
            if !word.is_empty() {
                words.push(word.to_string());
            }
        }

        if self.delete && scanned > 0 {
            fs::write(&self.path, lines[scanned..].concat())
                .map_err(|source| self.io_error(source))?;
            debug!("Removed {scanned} line(s) from {}", self.path.display());
        }

        let (kept, too_long): (Vec<String>, Vec<String>) = words
            .into_iter()
            .partition(|w| w.chars().count() <= self.max_word_len);

        for word in &too_long {
            warn!(
                "Dropping {word:?}: longer than {} characters",
                self.max_word_len
            );
        }

        Ok(kept)
    }

    fn io_error(&self, source: std::io::Error) -> QueueError {
        QueueError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
