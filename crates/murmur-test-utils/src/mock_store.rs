// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use murmur_core::{
    AdapterType, FeedbackId, FeedbackRecord, HealthStatus, MurmurError, PluginAdapter, RecordStore,
};

/// A record store backed by a `HashMap`.
///
/// Writes can be made to fail globally; reads can fail globally or for
/// specific ids. Every `get` is logged for assertions.
#[derive(Default)]
pub struct MockStore {
    records: Mutex<HashMap<FeedbackId, FeedbackRecord>>,
    fail_writes: AtomicBool,
    fail_all_reads: AtomicBool,
    failing_reads: Mutex<HashSet<FeedbackId>>,
    get_calls: Mutex<Vec<FeedbackId>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record without going through `put`.
    pub async fn insert(&self, record: FeedbackRecord) {
        self.records.lock().await.insert(record.id.clone(), record);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_all_reads(&self, fail: bool) {
        self.fail_all_reads.store(fail, Ordering::SeqCst);
    }

    /// Make reads of `id` fail with a storage error.
    pub async fn fail_reads_for(&self, id: &FeedbackId) {
        self.failing_reads.lock().await.insert(id.clone());
    }

    pub async fn record(&self, id: &FeedbackId) -> Option<FeedbackRecord> {
        self.records.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Ids passed to `get`, in call order.
    pub async fn get_calls(&self) -> Vec<FeedbackId> {
        self.get_calls.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        if self.fail_all_reads.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("reads failing".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), MurmurError> {
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn put(&self, record: &FeedbackRecord) -> Result<(), MurmurError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MurmurError::storage("mock store: write failure injected"));
        }
        self.records
            .lock()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &FeedbackId) -> Result<Option<FeedbackRecord>, MurmurError> {
        self.get_calls.lock().await.push(id.clone());
        if self.fail_all_reads.load(Ordering::SeqCst)
            || self.failing_reads.lock().await.contains(id)
        {
            return Err(MurmurError::storage(format!(
                "mock store: read failure injected for {id}"
            )));
        }
        Ok(self.records.lock().await.get(id).cloned())
    }
}
