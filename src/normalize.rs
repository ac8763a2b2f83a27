use serde::Serialize;

use crate::document::MeaningDocument;

/// One meaning of a headword, ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeaningFragment {
    pub word: String,
    pub part_of_speech: String,
    pub definition: String,
    pub synonyms: Vec<SynonymEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynonymEntry {
    pub term: String,
    pub similarity: u8,
}

/// Reduces a raw document to fragments for `word`.
///
/// Keeps definition, part of speech, and each synonym's term and similarity;
/// everything else the page shipped is dropped. Order follows the document.
pub fn normalize(word: &str, document: &MeaningDocument) -> Vec<MeaningFragment> {
    document
        .meanings
        .iter()
        .map(|meaning| MeaningFragment {
            word: word.to_string(),
            part_of_speech: meaning.pos.clone(),
            definition: meaning.definition.clone(),
            synonyms: meaning
                .synonyms
                .iter()
                .map(|syn| SynonymEntry {
                    term: syn.term.clone(),
                    similarity: syn.similarity.get(),
                })
                .collect(),
        })
        .collect()
}
