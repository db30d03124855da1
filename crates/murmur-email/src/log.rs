// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification channel that writes alerts to the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use murmur_core::{AdapterType, Alert, DeliveryId, HealthStatus, MurmurError, NotificationChannel, PluginAdapter};

pub struct LogNotifier {
    source: String,
}

impl LogNotifier {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
        }
    }
}

#[async_trait]
impl PluginAdapter for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MurmurError> {
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for LogNotifier {
    async fn send_alert(&self, alert: &Alert) -> Result<DeliveryId, MurmurError> {
        let id = DeliveryId(uuid::Uuid::new_v4().to_string());
        info!(
            delivery_id = %id,
            from = %self.source,
            to = %alert.destination,
            subject = %alert.subject,
            body = %alert.body,
            "alert logged (email transport = log)"
        );
        Ok(id)
    }
}
