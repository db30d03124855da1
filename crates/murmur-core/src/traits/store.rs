// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait for feedback persistence backends.

use async_trait::async_trait;

use crate::error::MurmurError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{FeedbackId, FeedbackRecord};

/// Key-value persistence of feedback records, keyed by [`FeedbackId`].
///
/// Implementations must keep "not found" (`Ok(None)`) apart from
/// infrastructure failures (`Err(MurmurError::Storage)`).
#[async_trait]
pub trait RecordStore: PluginAdapter {
    /// Writes the record under its id, replacing any previous value.
    async fn put(&self, record: &FeedbackRecord) -> Result<(), MurmurError>;

    /// Reads the record with the given id.
    async fn get(&self, id: &FeedbackId) -> Result<Option<FeedbackRecord>, MurmurError>;
}
