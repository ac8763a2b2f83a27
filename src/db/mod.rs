//! Thesaurus store on SQLite
use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub mod lookup;
pub mod models;
pub mod upsert;

/// Errors surfaced by the store. Any of these ends the batch.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no {entity} row for {value:?}")]
    MissingRow { entity: &'static str, value: String },
}

impl StoreError {
    /// Whether a UNIQUE, PRIMARY KEY, FOREIGN KEY or CHECK constraint rejected the write.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
        )
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

fn schema_sql(max_word_len: usize) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS parts_of_speech (
    pos_id INTEGER PRIMARY KEY AUTOINCREMENT,
    pos TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS words (
    word_id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE CHECK (length(word) <= {max_word_len})
);

CREATE TABLE IF NOT EXISTS meanings (
    meaning_id INTEGER PRIMARY KEY AUTOINCREMENT,
    meaning TEXT NOT NULL,
    pos_id INTEGER NOT NULL,
    word_id INTEGER NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (pos_id) REFERENCES parts_of_speech(pos_id),
    FOREIGN KEY (word_id) REFERENCES words(word_id)
);

CREATE INDEX IF NOT EXISTS idx_meaning_text ON meanings(meaning);
CREATE INDEX IF NOT EXISTS idx_meaning_word ON meanings(word_id);

CREATE TABLE IF NOT EXISTS syn_map_meaning (
    meaning_id INTEGER NOT NULL,
    syn_id INTEGER NOT NULL,
    similarity_rating INTEGER NOT NULL CHECK (similarity_rating BETWEEN 0 AND 100),
    PRIMARY KEY (meaning_id, syn_id),
    FOREIGN KEY (meaning_id) REFERENCES meanings(meaning_id),
    FOREIGN KEY (syn_id) REFERENCES words(word_id)
);

CREATE INDEX IF NOT EXISTS idx_syn_word ON syn_map_meaning(syn_id);
"#
    )
}

/// A SQLite connection initialized with the thesaurus schema.
pub struct Db {
    pub(crate) conn: Connection,
}

impl Db {
    /// Open a database at `path` and create any missing tables.
    ///
    /// `max_word_len` bounds the `words.word` column for newly created
    /// databases; an existing table keeps the limit it was created with.
    pub fn open<P: AsRef<Path>>(path: P, max_word_len: usize) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening thesaurus database: {}", path.display());

        let conn = Connection::open(path)?;
        Self::init(conn, max_word_len)
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory(max_word_len: usize) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, max_word_len)
    }

    fn init(conn: Connection, max_word_len: usize) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(&schema_sql(max_word_len))?;
        info!("Database schema ready");
        Ok(Self { conn })
    }
}
