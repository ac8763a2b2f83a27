/// In-memory fetcher serving canned documents.
///
/// Used by tests and for replaying captured pages without touching the
/// network.
use std::cell::RefCell;
use std::collections::HashMap;

use super::{DocumentFetcher, FetchError};
use crate::document::MeaningDocument;

#[derive(Default)]
pub struct StaticFetcher {
    documents: HashMap<String, MeaningDocument>,
    failures: HashMap<String, FetchError>,
    requested: RefCell<Vec<String>>,
}

impl StaticFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` for `word`.
    #[must_use]
    pub fn with_document(mut self, word: &str, document: MeaningDocument) -> Self {
        self.documents.insert(word.to_string(), document);
        self
    }

    /// Answer `word` with a non-success status.
    #[must_use]
    pub fn with_status(self, word: &str, status: u16) -> Self {
        self.with_error(word, FetchError::Status(status))
    }

    /// Fail `word` with `error`, e.g. a page whose embedded data is unusable.
    #[must_use]
    pub fn with_error(mut self, word: &str, error: FetchError) -> Self {
        self.failures.insert(word.to_string(), error);
        self
    }

    /// Words requested so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl DocumentFetcher for StaticFetcher {
    fn fetch(&self, word: &str) -> Result<MeaningDocument, FetchError> {
        self.requested.borrow_mut().push(word.to_string());

        if let Some(error) = self.failures.get(word) {
            return Err(error.clone());
        }

        // Unknown words behave like a missing page
        self.documents
            .get(word)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}
