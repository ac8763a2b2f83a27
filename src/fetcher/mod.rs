/// Document fetcher trait and shared error type.
///
/// A fetcher turns a headword into a raw [`MeaningDocument`]. The pipeline
/// only sees this contract; how the page is requested and picked apart is
/// up to the implementation.
pub mod mock;
pub mod thesaurus;

use thiserror::Error;

use crate::document::MeaningDocument;

/// Reasons a word could not be turned into a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("got status code {0}")]
    Status(u16),

    #[error("missing expected content: {0}")]
    MissingContent(String),

    #[error("malformed embedded data: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Whether the page was retrieved but its content could not be used.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::MissingContent(_) | Self::Malformed(_))
    }
}

/// Source of meaning documents, one word at a time.
pub trait DocumentFetcher {
    fn fetch(&self, word: &str) -> Result<MeaningDocument, FetchError>;
}
