// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the FeedbackQueue trait.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use murmur_config::model::QueueConfig;
use murmur_core::{
    AdapterType, FeedbackQueue, HealthStatus, MessageId, MurmurError, PluginAdapter,
    QueueReference, ReceivedMessage,
};

use crate::database::Database;
use crate::queries;

/// Redelivery policy of a [`SqliteQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOptions {
    /// How long a received message stays hidden.
    pub visibility_timeout: Duration,
    /// Deliveries allowed before a message is dead-lettered.
    pub max_receives: u32,
}

impl QueueOptions {
    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            visibility_timeout: Duration::from_secs(config.visibility_timeout_secs),
            max_receives: config.max_receives,
        }
    }
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self::from_config(&QueueConfig::default())
    }
}

/// A named queue stored in the `queue_messages` table.
pub struct SqliteQueue {
    db: Database,
    queue_name: String,
    options: QueueOptions,
}

impl SqliteQueue {
    pub fn new(db: Database, queue_name: impl Into<String>, options: QueueOptions) -> Self {
        Self {
            db,
            queue_name: queue_name.into(),
            options,
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Messages that exhausted their deliveries.
    pub async fn dead_letters(&self) -> Result<Vec<ReceivedMessage>, MurmurError> {
        queries::queue::dead_letters(&self.db, &self.queue_name)
            .await
            .map_err(queue_err("list dead letters"))
    }

    /// Messages not yet acknowledged or dead-lettered.
    pub async fn pending_count(&self) -> Result<u64, MurmurError> {
        queries::queue::pending_count(&self.db, &self.queue_name)
            .await
            .map_err(queue_err("count pending messages"))
    }
}

fn queue_err(action: &'static str) -> impl Fn(MurmurError) -> MurmurError {
    move |e| MurmurError::Queue {
        message: format!("failed to {action}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for SqliteQueue {
    fn name(&self) -> &str {
        "sqlite-queue"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Queue
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        let dead = self.dead_letters().await?.len();
        if dead > 0 {
            Ok(HealthStatus::Degraded(format!(
                "{dead} dead-lettered message(s) in `{}`",
                self.queue_name
            )))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), MurmurError> {
        Ok(())
    }
}

#[async_trait]
impl FeedbackQueue for SqliteQueue {
    async fn send(&self, reference: &QueueReference) -> Result<MessageId, MurmurError> {
        let id = queries::queue::enqueue(&self.db, &self.queue_name, &reference.to_body())
            .await
            .map_err(queue_err("enqueue reference"))?;
        debug!(queue = %self.queue_name, message_id = id, "reference enqueued");
        Ok(MessageId(id.to_string()))
    }

    async fn receive_batch(&self, max: usize) -> Result<Vec<ReceivedMessage>, MurmurError> {
        let claimed = queries::queue::claim(
            &self.db,
            &self.queue_name,
            max,
            self.options.visibility_timeout,
            self.options.max_receives,
        )
        .await
        .map_err(queue_err("receive messages"))?;

        if claimed.dead_lettered > 0 {
            warn!(
                queue = %self.queue_name,
                count = claimed.dead_lettered,
                max_receives = self.options.max_receives,
                "messages moved to dead letters"
            );
        }
        Ok(claimed.messages)
    }

    async fn ack(&self, message_id: &MessageId) -> Result<(), MurmurError> {
        let id: i64 = message_id.0.parse().map_err(|_| MurmurError::Queue {
            message: format!("unknown message id `{message_id}`"),
            source: None,
        })?;
        let deleted = queries::queue::delete(&self.db, &self.queue_name, id)
            .await
            .map_err(queue_err("acknowledge message"))?;
        if !deleted {
            debug!(queue = %self.queue_name, message_id = id, "ack for message already removed");
        }
        Ok(())
    }
}
