use log::info;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;

/// Durable set of already-imported `(datetime_key, hash)` pairs
pub trait ImportIndex: Send + Sync {
    /// Whether the pair was committed by this or any earlier run
    fn contains(&self, datetime_key: &str, hash: &str) -> Result<bool>;

    /// Record the pair; returns `false` if it was already present
    fn insert(&self, datetime_key: &str, hash: &str) -> Result<bool>;
}

/// SQLite-backed import index
///
/// The pair is unique through the `time_hash` index, so duplicate inserts
/// are ignored by the database rather than checked by the caller.
pub struct SqliteIndex {
    conn: Mutex<Connection>,
}

impl SqliteIndex {
    /// Open (creating if missing) the index database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 10000;",
        )?;
        let index = Self::with_connection(conn)?;

        info!("Import index initialized at {}", path.display());
        Ok(index)
    }

    /// Open a throwaway in-memory index
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS processed (
                time TEXT NOT NULL,
                hash TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS time_hash ON processed (time, hash);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of committed records
    pub fn record_count(&self) -> Result<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT count(*) FROM processed", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves no partial state in SQLite
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ImportIndex for SqliteIndex {
    fn contains(&self, datetime_key: &str, hash: &str) -> Result<bool> {
        let count: i64 = self.lock().query_row(
            "SELECT count(*) FROM processed WHERE time = ?1 AND hash = ?2",
            params![datetime_key, hash],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn insert(&self, datetime_key: &str, hash: &str) -> Result<bool> {
        let changed = self.lock().execute(
            "INSERT OR IGNORE INTO processed (time, hash) VALUES (?1, ?2)",
            params![datetime_key, hash],
        )?;
        Ok(changed > 0)
    }
}
