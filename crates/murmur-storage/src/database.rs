// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements run on tokio-rusqlite's single background thread. Clones of
//! [`Database`] share that thread, so the record store and the queue never
//! contend for the file.

use std::path::Path;
use std::time::Duration;

use murmur_core::MurmurError;
use tracing::{debug, info};

/// Handle to the SQLite database shared by the store and the queue.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs and run migrations.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, MurmurError> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| MurmurError::Storage {
                        source: Box::new(e),
                    })?;
                }
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        let journal_mode = conn
            .call(move |conn| -> Result<String, rusqlite::Error> {
                conn.busy_timeout(Duration::from_secs(5))?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.pragma_update(None, "foreign_keys", "ON")?;
                let mode = if wal_mode { "WAL" } else { "DELETE" };
                conn.pragma_update_and_check(None, "journal_mode", mode, |row| row.get(0))
            })
            .await
            .map_err(map_tr_err)?;

        conn.call(|conn| Ok::<_, rusqlite::Error>(crate::migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;

        info!(path, journal_mode = %journal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), MurmurError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert tokio-rusqlite errors into [`MurmurError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error) -> MurmurError {
    MurmurError::Storage {
        source: Box::new(e),
    }
}

/// Milliseconds since the Unix epoch, used for queue visibility.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
