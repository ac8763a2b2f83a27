//! Raw meaning documents as scraped from a thesaurus page.
//!
//! These mirror the `posTabs` entries embedded in the page state. Fields the
//! pipeline does not use are kept in `extra` so nothing is silently lost
//! before normalization.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Everything the page had to say about one headword.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MeaningDocument {
    pub meanings: Vec<RawMeaning>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawMeaning {
    pub definition: String,
    pub pos: String,
    #[serde(default)]
    pub synonyms: Vec<RawSynonym>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawSynonym {
    pub term: String,
    pub similarity: Similarity,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Closeness of a synonym to the meaning's sense, 0 to 100.
///
/// The page ships it as a string (`"100"`), older dumps as a number; both
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "SimilarityRepr", into = "u8")]
pub struct Similarity(u8);

impl Similarity {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Result<Self, String> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or_else(|| format!("similarity {value} outside 0..={}", Self::MAX))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<Similarity> for u8 {
    fn from(s: Similarity) -> Self {
        s.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SimilarityRepr {
    Int(i64),
    Text(String),
}

impl TryFrom<SimilarityRepr> for Similarity {
    type Error = String;

    fn try_from(repr: SimilarityRepr) -> Result<Self, Self::Error> {
        match repr {
            SimilarityRepr::Int(v) => Similarity::new(v),
            SimilarityRepr::Text(s) => {
                let v: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| format!("similarity {s:?} is not a number"))?;
                Similarity::new(v)
            }
        }
    }
}
