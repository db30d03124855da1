// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Murmur feedback pipeline.
//!
//! This crate provides the error type, domain types, and adapter traits
//! shared by the submission service, the batch consumer, and every backend.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MurmurError;
pub use types::{
    AdapterType, Alert, DeliveryId, FeedbackId, FeedbackRecord, FeedbackStatus, HealthStatus,
    MessageId, QueueReference, ReceivedMessage,
};

pub use traits::{FeedbackQueue, NotificationChannel, PluginAdapter, RecordStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_traits_are_object_safe() {
        fn _store(_: &dyn RecordStore) {}
        fn _queue(_: &dyn FeedbackQueue) {}
        fn _notifier(_: &dyn NotificationChannel) {}
        fn _adapter(_: &dyn PluginAdapter) {}
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }
}
