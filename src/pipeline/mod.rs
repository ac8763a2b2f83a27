//! Batch driver: queue → fetch → normalize → store.
//!
//! Words are handled one at a time. Fetch and parse problems are written to
//! the error log and the word is skipped; a store failure ends the batch and
//! leaves whatever was already written in place.
pub mod mock;

use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::{Db, StoreError};
use crate::error_log::ErrorLog;
use crate::fetcher::DocumentFetcher;
use crate::normalize::{MeaningFragment, normalize};
use crate::queue::{QueueError, WorkQueue};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

/// Pause between requests to the page source.
pub trait Throttle {
    fn wait(&self, delay: Duration);
}

/// Blocks the calling thread for the whole delay.
pub struct ThreadSleep;

impl Throttle for ThreadSleep {
    fn wait(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Fragments produced for one headword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedWord {
    pub word: String,
    pub fragments: Vec<MeaningFragment>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Words popped from the queue and handed to the fetcher.
    pub taken: usize,
    pub failed: usize,
    /// Fetched fine but had no meanings.
    pub empty: usize,
    pub persisted: usize,
    pub meanings: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    NoWords,
    NothingToPersist(BatchReport),
    Persisted(BatchReport),
}

pub struct Pipeline<'a, F: DocumentFetcher + ?Sized, T: Throttle + ?Sized> {
    config: &'a Config,
    fetcher: &'a F,
    throttle: &'a T,
    log: &'a ErrorLog,
}

impl<'a, F: DocumentFetcher + ?Sized, T: Throttle + ?Sized> Pipeline<'a, F, T> {
    pub fn new(config: &'a Config, fetcher: &'a F, throttle: &'a T, log: &'a ErrorLog) -> Self {
        Self {
            config,
            fetcher,
            throttle,
            log,
        }
    }

    /// Runs one batch end to end.
    pub fn run(&self) -> Result<BatchOutcome, PipelineError> {
        let queue = WorkQueue::from_config(self.config);
        let words = queue.take(self.config.words_per_run).inspect_err(|e| {
            error!("{e}");
            self.log.record(&queue.path().display().to_string(), e);
        })?;

        if words.is_empty() {
            info!("No words to scrape");
            return Ok(BatchOutcome::NoWords);
        }

        let mut report = BatchReport {
            taken: words.len(),
            ..Default::default()
        };

        let scraped = self.collect(&words, &mut report);
        if scraped.is_empty() {
            info!("Nothing scrapable for {words:?}");
            return Ok(BatchOutcome::NothingToPersist(report));
        }

        let mut db = Db::open(&self.config.db_path, self.config.max_word_len).inspect_err(|e| {
            error!("{e}");
            self.log.record(&self.config.db_path, e);
        })?;
        self.persist(&mut db, &scraped, &mut report)?;

        info!(
            "Persisted {} word(s), {} meaning(s); {} failed, {} empty",
            report.persisted, report.meanings, report.failed, report.empty
        );
        Ok(BatchOutcome::Persisted(report))
    }

    /// Fetches and normalizes each word, waiting between attempts.
    pub fn collect(&self, words: &[String], report: &mut BatchReport) -> Vec<ScrapedWord> {
        let mut scraped = Vec::new();

        for (i, word) in words.iter().enumerate() {
            info!("Scraping {word:?} ({}/{})", i + 1, words.len());

            match self.fetcher.fetch(word) {
                Ok(document) => {
                    let fragments = normalize(word, &document);
                    if fragments.is_empty() {
                        info!("No meanings found for {word:?}");
                        report.empty += 1;
                    } else {
                        scraped.push(ScrapedWord {
                            word: word.clone(),
                            fragments,
                        });
                    }
                }
                Err(e) => {
                    if e.is_parse_failure() {
                        warn!("Skipping {word:?}, page not usable: {e}");
                    } else {
                        warn!("Skipping {word:?}: {e}");
                    }
                    self.log.record(word, &e);
                    report.failed += 1;
                }
            }

            if i + 1 < words.len() {
                self.throttle.wait(self.config.wait());
            }
        }

        scraped
    }

    /// Writes every scraped word in order; the first store error stops the batch.
    pub fn persist(
        &self,
        db: &mut Db,
        scraped: &[ScrapedWord],
        report: &mut BatchReport,
    ) -> Result<(), PipelineError> {
        for entry in scraped {
            let applied = if self.config.atomic_per_word {
                db.apply_atomic(&entry.fragments)
            } else {
                db.apply(&entry.fragments)
            };

            if let Err(e) = applied {
                error!("Store failure for {:?}: {e}", entry.word);
                self.log.record(&entry.word, &e);
                return Err(e.into());
            }

            report.persisted += 1;
            report.meanings += entry.fragments.len();
        }
        Ok(())
    }
}
