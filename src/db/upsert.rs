use super::{Db, Result, StoreError};
use crate::normalize::MeaningFragment;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, error};

/// Relations whose rows are keyed by a single natural value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unique {
    Word,
    PartOfSpeech,
}

impl Unique {
    fn table(self) -> &'static str {
        match self {
            Self::Word => "words",
            Self::PartOfSpeech => "parts_of_speech",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::PartOfSpeech => "pos",
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            Self::Word => "word_id",
            Self::PartOfSpeech => "pos_id",
        }
    }
}

/// Insert a row holding `value` unless one already exists.
///
/// Lookup then insert; not atomic against other writers.
pub fn ensure(conn: &Connection, entity: Unique, value: &str) -> Result<()> {
    if lookup_id(conn, entity, value)?.is_some() {
        return Ok(());
    }

    conn.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1)",
            entity.table(),
            entity.column()
        ),
        params![value],
    )?;
    debug!("Inserted {} {value:?}", entity.table());
    Ok(())
}

/// Id of the row holding exactly `value`, if any.
pub fn lookup_id(conn: &Connection, entity: Unique, value: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            &format!(
                "SELECT {} FROM {} WHERE {} = ?1",
                entity.id_column(),
                entity.table(),
                entity.column()
            ),
            params![value],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn resolve_id(conn: &Connection, entity: Unique, value: &str) -> Result<i64> {
    lookup_id(conn, entity, value)?.ok_or_else(|| StoreError::MissingRow {
        entity: entity.table(),
        value: value.to_string(),
    })
}

/// First meaning (by id) carrying this exact definition text.
///
/// Definitions are not unique across words, so this may return a meaning
/// that belongs to another headword.
pub fn meaning_id_by_definition(conn: &Connection, definition: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT meaning_id FROM meanings WHERE meaning = ?1 ORDER BY meaning_id LIMIT 1",
            params![definition],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Write `fragments` in order, stopping at the first failed statement.
///
/// Parts of speech and words are inserted only when absent. Every fragment
/// adds a new meaning row, even when an identical one exists.
pub fn apply_fragments(conn: &Connection, fragments: &[MeaningFragment]) -> Result<()> {
    for fragment in fragments {
        ensure(conn, Unique::PartOfSpeech, &fragment.part_of_speech)?;
        ensure(conn, Unique::Word, &fragment.word)?;

        let pos_id = resolve_id(conn, Unique::PartOfSpeech, &fragment.part_of_speech)?;
        let word_id = resolve_id(conn, Unique::Word, &fragment.word)?;

        conn.execute(
            "INSERT INTO meanings (meaning, pos_id, word_id) VALUES (?1, ?2, ?3)",
            params![fragment.definition, pos_id, word_id],
        )?;

        let meaning_id = meaning_id_by_definition(conn, &fragment.definition)?.ok_or_else(|| {
            StoreError::MissingRow {
                entity: "meanings",
                value: fragment.definition.clone(),
            }
        })?;

        for synonym in &fragment.synonyms {
            ensure(conn, Unique::Word, &synonym.term)?;
            let syn_id = resolve_id(conn, Unique::Word, &synonym.term)?;

            conn.execute(
                "INSERT INTO syn_map_meaning (meaning_id, syn_id, similarity_rating) VALUES (?1, ?2, ?3)",
                params![meaning_id, syn_id, synonym.similarity],
            )
            .map_err(|e| {
                error!(
                    "Failed to link synonym {:?} (similarity {}) to {:?} [{}] {:?}: {e}",
                    synonym.term,
                    synonym.similarity,
                    fragment.word,
                    fragment.part_of_speech,
                    fragment.definition
                );
                StoreError::from(e)
            })?;
        }
    }

    Ok(())
}

impl Db {
    /// Apply one word's fragments, each statement committing on its own.
    pub fn apply(&self, fragments: &[MeaningFragment]) -> Result<()> {
        apply_fragments(&self.conn, fragments)
    }

    /// Apply one word's fragments inside a single transaction.
    ///
    /// On failure nothing from this call is kept; earlier calls are unaffected.
    pub fn apply_atomic(&mut self, fragments: &[MeaningFragment]) -> Result<()> {
        let tx = self.conn.transaction()?;
        apply_fragments(&tx, fragments)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert-if-absent for a single natural key.
    pub fn ensure(&self, entity: Unique, value: &str) -> Result<()> {
        ensure(&self.conn, entity, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::SynonymEntry;

    fn fragment(word: &str, pos: &str, definition: &str, syns: &[(&str, u8)]) -> MeaningFragment {
        MeaningFragment {
            word: word.to_string(),
            part_of_speech: pos.to_string(),
            definition: definition.to_string(),
            synonyms: syns
                .iter()
                .map(|(term, similarity)| SynonymEntry {
                    term: term.to_string(),
                    similarity: *similarity,
                })
                .collect(),
        }
    }

    fn count(db: &Db, sql: &str) -> i64 {
        db.conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let db = Db::open_in_memory(100).unwrap();
        db.ensure(Unique::Word, "run").unwrap();
        db.ensure(Unique::Word, "run").unwrap();
        db.ensure(Unique::PartOfSpeech, "verb").unwrap();
        db.ensure(Unique::PartOfSpeech, "verb").unwrap();

        assert_eq!(count(&db, "SELECT COUNT(*) FROM words WHERE word = 'run'"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM parts_of_speech"), 1);
    }

    #[test]
    fn test_values_are_bound_not_interpolated() {
        let db = Db::open_in_memory(100).unwrap();
        let tricky = r#"it's "quoted"; DROP TABLE words; --"#;
        db.ensure(Unique::Word, tricky).unwrap();

        assert_eq!(
            lookup_id(&db.conn, Unique::Word, tricky).unwrap(),
            Some(1)
        );
    }

    #[test]
    fn test_apply_single_meaning() {
        let db = Db::open_in_memory(100).unwrap();
        db.apply(&[fragment("run", "verb", "move quickly", &[("jog", 80)])])
            .unwrap();

        assert_eq!(count(&db, "SELECT COUNT(*) FROM parts_of_speech WHERE pos = 'verb'"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM words"), 2);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM meanings WHERE meaning = 'move quickly'"), 1);

        let (syn, similarity): (String, i64) = db
            .conn
            .query_row(
                "SELECT w.word, s.similarity_rating FROM syn_map_meaning s JOIN words w ON w.word_id = s.syn_id",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(syn, "jog");
        assert_eq!(similarity, 80);
    }

    #[test]
    fn test_shared_words_are_not_duplicated() {
        let db = Db::open_in_memory(100).unwrap();
        db.apply(&[
            fragment("run", "verb", "move quickly", &[("jog", 80), ("dash", 70)]),
            fragment("run", "verb", "operate", &[("work", 90), ("run", 10)]),
        ])
        .unwrap();

        assert_eq!(count(&db, "SELECT COUNT(*) FROM words"), 4);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM parts_of_speech"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM meanings"), 2);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM syn_map_meaning"), 4);
    }

    #[test]
    fn test_repeated_apply_duplicates_meanings_only() {
        let db = Db::open_in_memory(100).unwrap();
        let fragments = [fragment("run", "verb", "move quickly", &[])];
        db.apply(&fragments).unwrap();
        db.apply(&fragments).unwrap();

        assert_eq!(count(&db, "SELECT COUNT(*) FROM meanings WHERE meaning = 'move quickly'"), 2);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM words"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM parts_of_speech"), 1);
    }

    #[test]
    fn test_duplicate_link_fails_fast() {
        let db = Db::open_in_memory(100).unwrap();
        let err = db
            .apply(&[
                fragment("run", "verb", "move quickly", &[("jog", 80), ("jog", 60), ("dash", 70)]),
                fragment("run", "noun", "a jog", &[("trot", 50)]),
            ])
            .unwrap_err();

        assert!(err.is_constraint_violation());
        // First link and everything before it stay; nothing after it is written
        assert_eq!(count(&db, "SELECT COUNT(*) FROM syn_map_meaning"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM words WHERE word = 'dash'"), 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM meanings"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM parts_of_speech WHERE pos = 'noun'"), 0);
    }

    #[test]
    fn test_apply_atomic_rolls_back_failed_word() {
        let mut db = Db::open_in_memory(100).unwrap();
        db.apply_atomic(&[fragment("walk", "verb", "go on foot", &[("stroll", 90)])])
            .unwrap();

        let err = db
            .apply_atomic(&[fragment("run", "verb", "move quickly", &[("jog", 80), ("jog", 60)])])
            .unwrap_err();
        assert!(err.is_constraint_violation());

        assert_eq!(count(&db, "SELECT COUNT(*) FROM meanings"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM words WHERE word IN ('run', 'jog')"), 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM words WHERE word = 'stroll'"), 1);
    }

    #[test]
    fn test_meaning_resolved_by_definition_text() {
        let db = Db::open_in_memory(100).unwrap();
        db.apply(&[fragment("sprint", "verb", "move quickly", &[])])
            .unwrap();
        db.apply(&[fragment("run", "verb", "move quickly", &[("jog", 80)])])
            .unwrap();

        // The link lands on the first meaning with that text, which is sprint's
        let owner: String = db
            .conn
            .query_row(
                "SELECT w.word FROM syn_map_meaning s
                 JOIN meanings m ON m.meaning_id = s.meaning_id
                 JOIN words w ON w.word_id = m.word_id",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(owner, "sprint");
    }

    #[test]
    fn test_too_long_synonym_is_store_failure() {
        let db = Db::open_in_memory(5).unwrap();
        let err = db
            .apply(&[fragment("run", "verb", "move quickly", &[("move at speed", 60)])])
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(count(&db, "SELECT COUNT(*) FROM meanings"), 1);
    }
}
