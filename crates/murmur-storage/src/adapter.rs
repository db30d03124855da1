// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RecordStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use murmur_config::model::StorageConfig;
use murmur_core::{
    AdapterType, FeedbackId, FeedbackRecord, HealthStatus, MurmurError, PluginAdapter, RecordStore,
};

use crate::database::Database;
use crate::queries;
use crate::queries::feedback::TableName;

/// SQLite-backed record store.
///
/// The database is opened on the first call to [`SqliteStorage::initialize`];
/// every other operation fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    inner: OnceCell<(Database, TableName)>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            inner: OnceCell::new(),
        }
    }

    /// Open the database, run migrations and create the feedback table.
    pub async fn initialize(&self) -> Result<(), MurmurError> {
        let table = TableName::new(&self.config.table_name)?;
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        queries::feedback::ensure_table(&db, &table).await?;
        self.inner
            .set((db, table))
            .map_err(|_| MurmurError::storage("storage already initialized"))?;
        debug!(
            path = %self.config.database_path,
            table = %self.config.table_name,
            "SQLite record store initialized"
        );
        Ok(())
    }

    /// A handle to the shared database, for adapters that live in the same file.
    pub fn database(&self) -> Result<Database, MurmurError> {
        self.inner().map(|(db, _)| db.clone())
    }

    fn inner(&self) -> Result<&(Database, TableName), MurmurError> {
        self.inner
            .get()
            .ok_or_else(|| MurmurError::storage("storage not initialized -- call initialize() first"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        let (db, _) = self.inner()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MurmurError> {
        if let Some((db, _)) = self.inner.get() {
            if self.config.wal_mode {
                db.checkpoint().await?;
            }
            debug!("record store shut down");
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteStorage {
    async fn put(&self, record: &FeedbackRecord) -> Result<(), MurmurError> {
        let (db, table) = self.inner()?;
        queries::feedback::put(db, table, record).await
    }

    async fn get(&self, id: &FeedbackId) -> Result<Option<FeedbackRecord>, MurmurError> {
        let (db, table) = self.inner()?;
        queries::feedback::get(db, table, id).await
    }
}
