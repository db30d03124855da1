// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all pipeline adapters must implement.

use async_trait::async_trait;

use crate::error::MurmurError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Murmur adapters.
///
/// Every adapter (record store, queue, notification channel, metrics) must
/// implement this trait, which provides identity, lifecycle, and health
/// check capabilities.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the role of this adapter in the pipeline.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, MurmurError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), MurmurError>;
}
