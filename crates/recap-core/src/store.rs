//! Quiz summary and API token persistence using SQLite.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::error::{RecapError, RecapResult};
use crate::types::QuizSummary;

/// SQLite-backed store for quiz summaries and bearer tokens.
///
/// Tokens are stored as SHA-256 hex digests; the plaintext is only ever
/// returned once, from [`SummaryStore::register_token`].
#[derive(Clone)]
pub struct SummaryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SummaryStore {
    /// Open (or create) a store. `":memory:"` opens a private in-memory database.
    pub fn new(db_path: impl AsRef<Path>) -> RecapResult<Self> {
        let path = db_path.as_ref();

        let conn = if path.to_str() == Some(":memory:") {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(path)?
        };

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.create_tables()?;

        Ok(store)
    }

    fn lock(&self) -> RecapResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RecapError::database("Connection lock poisoned"))
    }

    fn create_tables(&self) -> RecapResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS quiz_summaries (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id      INTEGER NOT NULL,
                summary_text TEXT NOT NULL,
                created_at   TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_quiz_summaries_user_id ON quiz_summaries(user_id);

            CREATE TABLE IF NOT EXISTS api_tokens (
                token_hash   TEXT PRIMARY KEY,
                user_id      INTEGER NOT NULL,
                created_at   TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Persist a quiz summary for `user_id`.
    pub fn save_quiz_summary(&self, user_id: i64, summary_text: &str) -> RecapResult<QuizSummary> {
        let conn = self.lock()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO quiz_summaries (user_id, summary_text, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, summary_text, created_at.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, user_id, "Saved quiz summary");

        Ok(QuizSummary {
            id,
            user_id,
            summary_text: summary_text.to_string(),
            created_at,
        })
    }

    /// All quiz summaries for `user_id`, oldest first.
    pub fn list_quiz_summaries(&self, user_id: i64) -> RecapResult<Vec<QuizSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, summary_text, created_at
            FROM quiz_summaries
            WHERE user_id = ?1
            ORDER BY id ASC
            "#,
        )?;

        let rows = stmt.query_map([user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let summaries = rows
            .map(|row| -> RecapResult<QuizSummary> {
                let (id, user_id, summary_text, created_at) = row?;
                Ok(QuizSummary {
                    id,
                    user_id,
                    summary_text,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect::<RecapResult<Vec<_>>>()?;

        Ok(summaries)
    }

    /// Issue a new bearer token for `user_id`.
    pub fn register_token(&self, user_id: i64) -> RecapResult<String> {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO api_tokens (token_hash, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![hash_token(&token), user_id, Utc::now().to_rfc3339()],
        )?;
        debug!(user_id, "Registered API token");

        Ok(token)
    }

    /// Resolve a bearer token to its user id.
    pub fn authenticate(&self, token: &str) -> RecapResult<Option<i64>> {
        let conn = self.lock()?;
        let user_id = conn
            .query_row(
                "SELECT user_id FROM api_tokens WHERE token_hash = ?1",
                [hash_token(token)],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(user_id)
    }
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn parse_timestamp(value: &str) -> RecapResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RecapError::database(format!("Invalid timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_list_quiz_summaries() {
        let store = SummaryStore::new(":memory:").unwrap();

        let first = store.save_quiz_summary(1, "likes geography").unwrap();
        store.save_quiz_summary(2, "other user").unwrap();
        store.save_quiz_summary(1, "good at maths").unwrap();

        let summaries = store.list_quiz_summaries(1).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, first.id);
        assert_eq!(summaries[0].summary_text, "likes geography");
        assert_eq!(summaries[1].summary_text, "good at maths");
        assert!(store.list_quiz_summaries(3).unwrap().is_empty());
    }

    #[test]
    fn test_token_round_trip() {
        let store = SummaryStore::new(":memory:").unwrap();

        let token = store.register_token(42).unwrap();
        assert_eq!(token.len(), 64);
        assert_eq!(store.authenticate(&token).unwrap(), Some(42));
        assert_eq!(store.authenticate("not-a-token").unwrap(), None);
    }

    #[test]
    fn test_tokens_stored_hashed() {
        let store = SummaryStore::new(":memory:").unwrap();
        let token = store.register_token(7).unwrap();

        let conn = store.conn.lock().unwrap();
        let stored: String = conn
            .query_row("SELECT token_hash FROM api_tokens", [], |row| row.get(0))
            .unwrap();
        assert_ne!(stored, token);
        assert_eq!(stored, hash_token(&token));
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("recap.db");

        {
            let store = SummaryStore::new(&path).unwrap();
            store.save_quiz_summary(1, "persisted").unwrap();
        }

        let reopened = SummaryStore::new(&path).unwrap();
        assert_eq!(reopened.list_quiz_summaries(1).unwrap()[0].summary_text, "persisted");
    }
}
