//! Durable word store backed by an embedded SQLite database.
//!
//! Two tables survive across sessions:
//!
//! | Table            | Purpose |
//! |------------------|---------|
//! | `captured_words` | Append-only list of user-captured `(word, meaning)` pairs |
//! | `cached_options` | Per-word distractor cache, one row per word, both directions |
//!
//! Distractor sets are stored as JSON arrays in nullable TEXT columns so a
//! row can hold either direction independently. Upserts are single SQL
//! statements, so a concurrent reader of the same key never observes a
//! half-written record. Nothing in the quiz path ever deletes a row; the
//! only reclamation is the explicit [`WordStore::prune_options_older_than`]
//! maintenance hook.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::quiz_engine::models::{CachedOptionRecord, CapturedWord, QuestionDirection, WordCandidate};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt cached option set: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct WordStore {
    conn: Connection,
}

impl WordStore {
    /// Open (creating if needed) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// An in-memory store, useful for tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS captured_words (
                 id         INTEGER PRIMARY KEY AUTOINCREMENT,
                 word       TEXT NOT NULL,
                 meaning    TEXT NOT NULL,
                 created_at INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS cached_options (
                 word            TEXT PRIMARY KEY,
                 forward_options TEXT,
                 reverse_options TEXT,
                 updated_at      INTEGER NOT NULL
             );",
        )?;
        Ok(WordStore { conn })
    }

    // -----------------------------------------------------------------------
    // Distractor cache
    // -----------------------------------------------------------------------

    /// Fetch the cached record for `word`. Absence is a normal, common state.
    pub fn cached_options(&self, word: &str) -> Result<Option<CachedOptionRecord>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT word, forward_options, reverse_options, updated_at
                 FROM cached_options WHERE word = ?1",
                params![word],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((word, forward, reverse, updated_at)) = row else {
            return Ok(None);
        };
        Ok(Some(CachedOptionRecord {
            word,
            forward_options: decode_options(forward)?,
            reverse_options: decode_options(reverse)?,
            updated_at,
        }))
    }

    /// Merge `options` for one direction into the record for `word`.
    ///
    /// The opposite direction's column is left untouched; only the targeted
    /// column and `updated_at` change. A single `INSERT .. ON CONFLICT`
    /// statement keeps the write atomic with respect to concurrent reads.
    pub fn upsert_options(
        &self,
        word: &str,
        direction: QuestionDirection,
        options: &[String],
        updated_at: i64,
    ) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(options)?;
        let sql = match direction {
            QuestionDirection::WordToMeaning => {
                "INSERT INTO cached_options (word, forward_options, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(word) DO UPDATE SET
                     forward_options = excluded.forward_options,
                     updated_at      = excluded.updated_at"
            }
            QuestionDirection::MeaningToWord => {
                "INSERT INTO cached_options (word, reverse_options, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(word) DO UPDATE SET
                     reverse_options = excluded.reverse_options,
                     updated_at      = excluded.updated_at"
            }
        };
        self.conn.execute(sql, params![word, encoded, updated_at])?;
        Ok(())
    }

    /// Delete cached option records last updated before `cutoff`.
    ///
    /// Maintenance hook only — the quiz path never evicts. Returns the number
    /// of records removed.
    pub fn prune_options_older_than(&self, cutoff: i64) -> Result<usize, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM cached_options WHERE updated_at < ?1", params![cutoff])?;
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Captured words
    // -----------------------------------------------------------------------

    /// Append confirmed candidates to the capture table.
    ///
    /// Candidates with an empty word or meaning are skipped (the capture
    /// editor allows half-filled rows). Returns how many were stored.
    pub fn add_captured_words(
        &self,
        candidates: &[WordCandidate],
        created_at: i64,
    ) -> Result<usize, StoreError> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO captured_words (word, meaning, created_at) VALUES (?1, ?2, ?3)",
        )?;
        let mut stored = 0;
        for candidate in candidates {
            if candidate.word.is_empty() || candidate.meaning.is_empty() {
                continue;
            }
            stmt.execute(params![candidate.word, candidate.meaning, created_at])?;
            stored += 1;
        }
        Ok(stored)
    }

    /// All captured words in insertion order.
    pub fn captured_words(&self) -> Result<Vec<CapturedWord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, word, meaning, created_at FROM captured_words ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CapturedWord {
                id: row.get(0)?,
                word: row.get(1)?,
                meaning: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        let mut words = Vec::new();
        for row in rows {
            words.push(row?);
        }
        Ok(words)
    }
}

fn decode_options(column: Option<String>) -> Result<Option<Vec<String>>, StoreError> {
    match column {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_record_is_absent_not_an_error() {
        let store = WordStore::open_in_memory().unwrap();
        assert!(store.cached_options("apple").unwrap().is_none());
    }

    #[test]
    fn upsert_merges_directions_without_erasing_the_other() {
        let store = WordStore::open_in_memory().unwrap();
        store
            .upsert_options("apple", QuestionDirection::WordToMeaning, &opts(&["柿", "梨", "桃"]), 100)
            .unwrap();
        store
            .upsert_options("apple", QuestionDirection::MeaningToWord, &opts(&["pear", "peach", "plum"]), 200)
            .unwrap();

        let rec = store.cached_options("apple").unwrap().unwrap();
        assert_eq!(rec.forward_options, Some(opts(&["柿", "梨", "桃"])));
        assert_eq!(rec.reverse_options, Some(opts(&["pear", "peach", "plum"])));
        assert_eq!(rec.updated_at, 200);

        // Re-generating forward must not clobber reverse either.
        store
            .upsert_options("apple", QuestionDirection::WordToMeaning, &opts(&["葡萄", "苺", "柚子"]), 300)
            .unwrap();
        let rec = store.cached_options("apple").unwrap().unwrap();
        assert_eq!(rec.forward_options, Some(opts(&["葡萄", "苺", "柚子"])));
        assert_eq!(rec.reverse_options, Some(opts(&["pear", "peach", "plum"])));
    }

    #[test]
    fn store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("battle.db");
        {
            let store = WordStore::open(&path).unwrap();
            store
                .upsert_options("dog", QuestionDirection::WordToMeaning, &opts(&["猫", "鳥", "馬"]), 42)
                .unwrap();
        }
        let store = WordStore::open(&path).unwrap();
        let rec = store.cached_options("dog").unwrap().unwrap();
        assert_eq!(rec.forward_options, Some(opts(&["猫", "鳥", "馬"])));
        assert_eq!(rec.updated_at, 42);
    }

    #[test]
    fn prune_removes_only_stale_records() {
        let store = WordStore::open_in_memory().unwrap();
        store
            .upsert_options("old", QuestionDirection::WordToMeaning, &opts(&["a", "b", "c"]), 10)
            .unwrap();
        store
            .upsert_options("new", QuestionDirection::WordToMeaning, &opts(&["d", "e", "f"]), 900)
            .unwrap();

        assert_eq!(store.prune_options_older_than(500).unwrap(), 1);
        assert!(store.cached_options("old").unwrap().is_none());
        assert!(store.cached_options("new").unwrap().is_some());
    }

    #[test]
    fn captured_words_round_trip_and_skip_incomplete() {
        let store = WordStore::open_in_memory().unwrap();
        let candidates = vec![
            WordCandidate { word: "apple".into(), meaning: "りんご".into() },
            WordCandidate { word: "orphan".into(), meaning: String::new() },
            WordCandidate { word: String::new(), meaning: "迷子".into() },
            WordCandidate { word: "dog".into(), meaning: "犬".into() },
        ];
        let stored = store.add_captured_words(&candidates, 1234).unwrap();
        assert_eq!(stored, 2);

        let words = store.captured_words().unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "apple");
        assert_eq!(words[1].word, "dog");
        assert_eq!(words[1].created_at, 1234);
    }
}
