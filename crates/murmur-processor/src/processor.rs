// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message classification and batch processing.
//!
//! Messages are processed one at a time, in order. Malformed bodies and
//! missing records are terminal: they are logged and count as handled.
//! A store or notification failure stops the batch at that message so the
//! queue can redeliver it and everything after it.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, info};

use murmur_core::{
    DeliveryId, MessageId, MurmurError, NotificationChannel, QueueReference, ReceivedMessage,
    RecordStore,
};

use crate::alert::critical_alert;

/// How a message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Critical record, alert delivered.
    Notified(DeliveryId),
    /// Record found and not critical.
    NotCritical,
    /// Body unparseable or without a `feedbackId`.
    Malformed,
    /// The referenced record does not exist.
    NotFound,
}

impl MessageOutcome {
    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            MessageOutcome::Notified(_) => "notified",
            MessageOutcome::NotCritical => "not_critical",
            MessageOutcome::Malformed => "malformed",
            MessageOutcome::NotFound => "not_found",
        }
    }
}

/// A message that needs no further delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledMessage {
    /// Queue id to acknowledge.
    pub message_id: MessageId,
    /// What processing concluded.
    pub outcome: MessageOutcome,
}

/// Result of a batch that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Every message of the batch, in delivery order.
    pub handled: Vec<HandledMessage>,
}

impl BatchReport {
    /// Number of alerts delivered in this batch.
    pub fn notified(&self) -> usize {
        self.handled
            .iter()
            .filter(|h| matches!(h.outcome, MessageOutcome::Notified(_)))
            .count()
    }
}

/// A batch stopped by an infrastructure failure.
///
/// `handled` holds the messages processed before `failed`. `failed` and
/// every later message were not handled.
#[derive(Debug, Error)]
#[error("batch aborted at message {failed} after {count} handled: {source}", count = .handled.len())]
pub struct BatchAborted {
    /// Messages handled before the failure, in delivery order.
    pub handled: Vec<HandledMessage>,
    /// The message whose processing failed.
    pub failed: MessageId,
    /// The infrastructure error that stopped the batch.
    pub source: MurmurError,
}

/// Resolves queue references and alerts the administrator about critical feedback.
pub struct BatchProcessor {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn NotificationChannel>,
    admin_address: String,
}

impl BatchProcessor {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn NotificationChannel>,
        admin_address: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            admin_address: admin_address.into(),
        }
    }

    /// Handle one message.
    ///
    /// `Err` means an infrastructure failure that a redelivery may fix.
    pub async fn process_message(
        &self,
        message: &ReceivedMessage,
    ) -> Result<MessageOutcome, MurmurError> {
        let reference = match QueueReference::from_body(&message.body) {
            Ok(reference) => reference,
            Err(e) => {
                error!(
                    message_id = %message.message_id,
                    body = %message.body,
                    error = %e,
                    "discarding malformed queue message"
                );
                return Ok(MessageOutcome::Malformed);
            }
        };
        let feedback_id = reference.feedback_id;

        let Some(record) = self.store.get(&feedback_id).await? else {
            error!(
                message_id = %message.message_id,
                feedback_id = %feedback_id,
                "referenced feedback not found, discarding message"
            );
            murmur_prometheus::record_missing_record();
            return Ok(MessageOutcome::NotFound);
        };

        if !record.is_critical() {
            debug!(feedback_id = %feedback_id, score = ?record.score, "feedback not critical");
            return Ok(MessageOutcome::NotCritical);
        }

        let alert = critical_alert(&record, &self.admin_address);
        let delivery_id = self.notifier.send_alert(&alert).await?;
        murmur_prometheus::record_alert_sent();
        info!(
            feedback_id = %feedback_id,
            score = ?record.score,
            delivery_id = %delivery_id,
            "critical feedback alert sent"
        );
        Ok(MessageOutcome::Notified(delivery_id))
    }

    /// Handle messages in order, stopping at the first failure.
    pub async fn process_batch(
        &self,
        messages: &[ReceivedMessage],
    ) -> Result<BatchReport, BatchAborted> {
        let started = Instant::now();
        let mut handled = Vec::with_capacity(messages.len());

        for message in messages {
            match self.process_message(message).await {
                Ok(outcome) => {
                    murmur_prometheus::record_message_processed(outcome.label());
                    handled.push(HandledMessage {
                        message_id: message.message_id.clone(),
                        outcome,
                    });
                }
                Err(source) => {
                    murmur_prometheus::record_batch_aborted();
                    murmur_prometheus::record_batch_duration(started.elapsed().as_secs_f64());
                    error!(
                        message_id = %message.message_id,
                        receive_count = message.receive_count,
                        handled = handled.len(),
                        remaining = messages.len() - handled.len(),
                        error = %source,
                        "batch aborted, unhandled messages left for redelivery"
                    );
                    return Err(BatchAborted {
                        handled,
                        failed: message.message_id.clone(),
                        source,
                    });
                }
            }
        }

        murmur_prometheus::record_batch_duration(started.elapsed().as_secs_f64());
        debug!(handled = handled.len(), "batch complete");
        Ok(BatchReport { handled })
    }
}
