//! SQLite-backed document store.
//!
//! Uses a plain `Arc<Mutex<Connection>>` rather than a pool: the store
//! holds exactly one document and each client instance is its only writer.
//! Concurrent writers across clients resolve last-write-wins at this
//! layer.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use flatsheet_core::Sheet;

use crate::error::{StoreError, StoreResult};
use crate::store::{SheetStore, DOCUMENT_KEY};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    key  TEXT PRIMARY KEY,
    body TEXT NOT NULL
)";

/// Document store persisting to a SQLite file
#[derive(Clone)]
pub struct SqliteSheetStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSheetStore {
    /// Open (or create) a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening sheet store");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::connection(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory store for testing
    pub fn memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl SheetStore for SqliteSheetStore {
    async fn load(&self) -> StoreResult<Option<Sheet>> {
        let body: Option<String> = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT body FROM documents WHERE key = ?1",
                params![DOCUMENT_KEY],
                |row| row.get(0),
            )
            .optional()?
        };
        match body {
            Some(body) => {
                let sheet = serde_json::from_str(&body)?;
                Ok(Some(sheet))
            }
            None => {
                debug!(key = DOCUMENT_KEY, "document key absent");
                Ok(None)
            }
        }
    }

    async fn save(&self, sheet: &Sheet) -> StoreResult<()> {
        let body = serde_json::to_string(sheet)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO documents (key, body) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET body = excluded.body",
            params![DOCUMENT_KEY, body],
        )?;
        debug!(bytes = body.len(), "document saved");
        Ok(())
    }

    async fn remove(&self) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM documents WHERE key = ?1",
            params![DOCUMENT_KEY],
        )?;
        Ok(())
    }
}
