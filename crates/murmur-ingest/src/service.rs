// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use murmur_core::types::now_timestamp;
use murmur_core::{
    FeedbackId, FeedbackQueue, FeedbackRecord, FeedbackStatus, MurmurError, QueueReference,
    RecordStore,
};

/// Input of a submission, already validated by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFeedback {
    pub description: Option<String>,
    pub score: Option<u8>,
    pub submitter_id: Option<String>,
}

/// Stores feedback and dispatches references to the processing queue.
///
/// The store write and the queue send are not transactional. A record can
/// be stored without ever being dispatched; that case is logged and counted.
pub struct SubmissionService {
    store: Arc<dyn RecordStore>,
    queue: Option<Arc<dyn FeedbackQueue>>,
}

impl SubmissionService {
    /// `queue` is `None` when no queue endpoint is configured.
    pub fn new(store: Arc<dyn RecordStore>, queue: Option<Arc<dyn FeedbackQueue>>) -> Self {
        Self { store, queue }
    }

    pub fn dispatches(&self) -> bool {
        self.queue.is_some()
    }

    /// Persist a new record and enqueue a reference to it.
    ///
    /// Fails only when the store write fails, in which case nothing is sent.
    /// Returns the record as built here, not re-read from the store.
    pub async fn submit(&self, feedback: NewFeedback) -> Result<FeedbackRecord, MurmurError> {
        let record = FeedbackRecord {
            id: FeedbackId::generate(),
            description: feedback.description,
            score: feedback.score,
            status: FeedbackStatus::Pending,
            submitted_at: now_timestamp(),
            submitter_id: feedback.submitter_id,
        };

        self.store.put(&record).await?;
        murmur_prometheus::record_feedback_submitted();
        info!(
            feedback_id = %record.id,
            score = ?record.score,
            critical = record.is_critical(),
            "feedback stored"
        );

        self.dispatch(&record.id).await;
        Ok(record)
    }

    async fn dispatch(&self, id: &FeedbackId) {
        let Some(queue) = &self.queue else {
            warn!(feedback_id = %id, "queue endpoint not configured, reference not dispatched");
            murmur_prometheus::record_dispatch_degraded("queue_unconfigured");
            return;
        };

        match queue.send(&QueueReference::new(id.clone())).await {
            Ok(message_id) => {
                debug!(feedback_id = %id, message_id = %message_id, "reference dispatched");
            }
            Err(e) => {
                warn!(feedback_id = %id, error = %e, "failed to dispatch reference, record stored without processing");
                murmur_prometheus::record_dispatch_degraded("send_failed");
            }
        }
    }
}
