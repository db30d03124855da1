// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue trait for the at-least-once reference transport.

use async_trait::async_trait;

use crate::error::MurmurError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MessageId, QueueReference, ReceivedMessage};

/// At-least-once transport of [`QueueReference`]s from submission to processing.
///
/// Received messages stay invisible for a visibility timeout. Messages that
/// are not acknowledged within it are delivered again.
#[async_trait]
pub trait FeedbackQueue: PluginAdapter {
    /// Enqueues a reference and returns the transport's message id.
    async fn send(&self, reference: &QueueReference) -> Result<MessageId, MurmurError>;

    /// Claims up to `max` visible messages, oldest first.
    async fn receive_batch(&self, max: usize) -> Result<Vec<ReceivedMessage>, MurmurError>;

    /// Acknowledges a message so it is never delivered again.
    async fn ack(&self, message_id: &MessageId) -> Result<(), MurmurError>;
}
