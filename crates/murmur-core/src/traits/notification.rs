// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification channel trait for administrator alerts.

use async_trait::async_trait;

use crate::error::MurmurError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Alert, DeliveryId};

/// Delivers alerts to an administrative address.
///
/// A malformed address yields [`MurmurError::InvalidAddress`]; a transport
/// failure yields [`MurmurError::Notification`].
#[async_trait]
pub trait NotificationChannel: PluginAdapter {
    /// Sends the alert and returns the channel's delivery id.
    async fn send_alert(&self, alert: &Alert) -> Result<DeliveryId, MurmurError>;
}
