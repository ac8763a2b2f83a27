use super::{Db, Result, models::*};
use rusqlite::{Row, params};

fn map_synonym_row(row: &Row<'_>) -> rusqlite::Result<SynonymRow> {
    Ok(SynonymRow {
        meaning_id: row.get(0)?,
        definition: row.get(1)?,
        part_of_speech: row.get(2)?,
        synonym: row.get(3)?,
        similarity: row.get(4)?,
    })
}

impl Db {
    /// Synonyms stored for a headword, grouped by meaning, closest first.
    pub fn synonyms_of(&self, word: &str) -> Result<Vec<SynonymRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT m.meaning_id, m.meaning, p.pos, syn.word, s.similarity_rating
            FROM meanings m
            JOIN words head ON head.word_id = m.word_id
            JOIN parts_of_speech p ON p.pos_id = m.pos_id
            JOIN syn_map_meaning s ON s.meaning_id = m.meaning_id
            JOIN words syn ON syn.word_id = s.syn_id
            WHERE head.word = ?1
            ORDER BY m.meaning_id, s.similarity_rating DESC, syn.word
            "#,
        )?;
        let rows = stmt.query_map(params![word], map_synonym_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Row counts for each relation.
    pub fn counts(&self) -> Result<TableCounts> {
        let counts = self.conn.query_row(
            r#"
            SELECT
                (SELECT COUNT(*) FROM parts_of_speech),
                (SELECT COUNT(*) FROM words),
                (SELECT COUNT(*) FROM meanings),
                (SELECT COUNT(*) FROM syn_map_meaning)
            "#,
            [],
            |row| {
                Ok(TableCounts {
                    parts_of_speech: row.get(0)?,
                    words: row.get(1)?,
                    meanings: row.get(2)?,
                    synonym_links: row.get(3)?,
                })
            },
        )?;
        Ok(counts)
    }
}
