use serde::Serialize;

/// A stored synonym link, joined back to its meaning and headword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynonymRow {
    pub meaning_id: i64,
    pub definition: String,
    pub part_of_speech: String,
    pub synonym: String,
    pub similarity: u8,
}

/// Row counts per relation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub parts_of_speech: i64,
    pub words: i64,
    pub meanings: i64,
    pub synonym_links: i64,
}
