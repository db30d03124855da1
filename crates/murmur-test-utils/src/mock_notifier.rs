// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification channel that captures alerts instead of sending them.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use murmur_core::{
    AdapterType, Alert, DeliveryId, HealthStatus, MurmurError, NotificationChannel, PluginAdapter,
};

/// Failure a [`MockNotifier`] can be told to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierFailure {
    /// Transport-level failure, like an unreachable relay.
    Transport,
    /// The destination address is rejected.
    InvalidAddress,
}

#[derive(Default)]
pub struct MockNotifier {
    next_id: AtomicU64,
    sent: Mutex<Vec<Alert>>,
    failure: Mutex<Option<NotifierFailure>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent send with `failure`, or succeed again with `None`.
    pub async fn fail_with(&self, failure: Option<NotifierFailure>) {
        *self.failure.lock().await = failure;
    }

    /// Alerts delivered so far, in order.
    pub async fn sent_alerts(&self) -> Vec<Alert> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        match *self.failure.lock().await {
            Some(_) => Ok(HealthStatus::Degraded("failure injected".into())),
            None => Ok(HealthStatus::Healthy),
        }
    }

    async fn shutdown(&self) -> Result<(), MurmurError> {
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for MockNotifier {
    async fn send_alert(&self, alert: &Alert) -> Result<DeliveryId, MurmurError> {
        match *self.failure.lock().await {
            Some(NotifierFailure::Transport) => {
                return Err(MurmurError::Notification {
                    message: "mock notifier: transport failure injected".into(),
                    source: None,
                });
            }
            Some(NotifierFailure::InvalidAddress) => {
                return Err(MurmurError::InvalidAddress {
                    address: alert.destination.clone(),
                    reason: "rejected by mock notifier".into(),
                });
            }
            None => {}
        }
        self.sent.lock().await.push(alert.clone());
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(DeliveryId(format!("mock-delivery-{n}")))
    }
}
