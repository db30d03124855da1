// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles adapters and services from a validated configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use murmur_config::model::MurmurConfig;
use murmur_core::{FeedbackQueue, MurmurError, NotificationChannel, PluginAdapter};
use murmur_ingest::SubmissionService;
use murmur_processor::{BatchProcessor, QueueConsumer};
use murmur_storage::{QueueOptions, SqliteQueue, SqliteStorage};

/// Every long-lived component of a running Murmur process.
pub struct Pipeline {
    pub storage: Arc<SqliteStorage>,
    /// `None` when `queue.endpoint` is not configured.
    pub queue: Option<Arc<SqliteQueue>>,
    pub notifier: Arc<dyn NotificationChannel>,
    pub submissions: Arc<SubmissionService>,
    admin_address: String,
    batch_size: usize,
    poll_interval: Duration,
}

impl Pipeline {
    /// Open storage, the queue and the notifier.
    ///
    /// No network connection is made; an unreachable SMTP relay shows up in
    /// health checks and alert delivery, not here.
    pub async fn build(config: &MurmurConfig) -> Result<Self, MurmurError> {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let storage = Arc::new(storage);

        let queue = match config.queue.endpoint() {
            Some(name) => {
                let queue = SqliteQueue::new(
                    storage.database()?,
                    name,
                    QueueOptions::from_config(&config.queue),
                );
                info!(queue = name, "feedback queue ready");
                Some(Arc::new(queue))
            }
            None => {
                warn!("queue.endpoint not configured, submissions will not be processed");
                None
            }
        };

        let notifier = murmur_email::build_notifier(&config.email)?;
        info!(
            transport = ?config.email.transport,
            admin = %config.email.admin_address,
            "notifier ready"
        );

        let submissions = Arc::new(SubmissionService::new(
            storage.clone(),
            queue.clone().map(|q| q as Arc<dyn FeedbackQueue>),
        ));

        Ok(Self {
            storage,
            queue,
            notifier,
            submissions,
            admin_address: config.email.admin_address.clone(),
            batch_size: config.queue.batch_size,
            poll_interval: Duration::from_millis(config.queue.poll_interval_ms),
        })
    }

    /// The batch consumer, when a queue is configured.
    pub fn consumer(&self) -> Option<QueueConsumer> {
        let queue = self.queue.clone()?;
        let processor = BatchProcessor::new(
            self.storage.clone(),
            self.notifier.clone(),
            self.admin_address.clone(),
        );
        Some(QueueConsumer::new(
            queue,
            processor,
            self.batch_size,
            self.poll_interval,
        ))
    }

    /// Adapters reported by `GET /health`.
    pub fn adapters(&self) -> Vec<Arc<dyn PluginAdapter>> {
        let mut adapters: Vec<Arc<dyn PluginAdapter>> = vec![self.storage.clone() as Arc<dyn PluginAdapter>];
        if let Some(queue) = &self.queue {
            adapters.push(queue.clone());
        }
        adapters.push(self.notifier.clone());
        adapters
    }

    /// Shut down every adapter. Failures are logged and do not stop the others.
    pub async fn shutdown(&self) {
        for adapter in self.adapters() {
            if let Err(e) = adapter.shutdown().await {
                warn!(adapter = adapter.name(), error = %e, "adapter shutdown failed");
            }
        }
    }
}
