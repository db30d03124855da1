// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory queue with explicit redelivery.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use murmur_core::{
    AdapterType, FeedbackQueue, HealthStatus, MessageId, MurmurError, PluginAdapter,
    QueueReference, ReceivedMessage,
};

/// A FIFO queue held in memory.
///
/// Received messages move to an in-flight set until acked. There is no
/// timer: call [`MockQueue::redeliver_unacked`] to simulate the visibility
/// timeout expiring.
#[derive(Default)]
pub struct MockQueue {
    next_id: AtomicU64,
    sent: Mutex<Vec<QueueReference>>,
    visible: Mutex<VecDeque<ReceivedMessage>>,
    in_flight: Mutex<HashMap<MessageId, ReceivedMessage>>,
    acked: Mutex<Vec<MessageId>>,
    fail_send: AtomicBool,
    fail_receive: AtomicBool,
    fail_ack: AtomicBool,
}

impl MockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a raw body, bypassing `send`. Useful for malformed messages.
    pub async fn push_raw(&self, body: impl Into<String>) -> MessageId {
        let message_id = MessageId(format!(
            "mock-msg-{}",
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1
        ));
        self.visible.lock().await.push_back(ReceivedMessage {
            message_id: message_id.clone(),
            body: body.into(),
            receive_count: 0,
        });
        message_id
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_receive(&self, fail: bool) {
        self.fail_receive.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_ack(&self, fail: bool) {
        self.fail_ack.store(fail, Ordering::SeqCst);
    }

    /// References passed to successful `send` calls.
    pub async fn sent(&self) -> Vec<QueueReference> {
        self.sent.lock().await.clone()
    }

    pub async fn acked(&self) -> Vec<MessageId> {
        self.acked.lock().await.clone()
    }

    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    pub async fn visible_count(&self) -> usize {
        self.visible.lock().await.len()
    }

    /// Make every unacked in-flight message visible again, oldest id first.
    pub async fn redeliver_unacked(&self) {
        let mut in_flight: Vec<_> = self.in_flight.lock().await.drain().map(|(_, m)| m).collect();
        in_flight.sort_by_key(|m| id_number(&m.message_id));
        let mut visible = self.visible.lock().await;
        for message in in_flight.into_iter().rev() {
            visible.push_front(message);
        }
    }
}

fn id_number(id: &MessageId) -> u64 {
    id.0.rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(u64::MAX)
}

fn injected(what: &str) -> MurmurError {
    MurmurError::Queue {
        message: format!("mock queue: {what} failure injected"),
        source: None,
    }
}

#[async_trait]
impl PluginAdapter for MockQueue {
    fn name(&self) -> &str {
        "mock-queue"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Queue
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MurmurError> {
        Ok(())
    }
}

#[async_trait]
impl FeedbackQueue for MockQueue {
    async fn send(&self, reference: &QueueReference) -> Result<MessageId, MurmurError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(injected("send"));
        }
        self.sent.lock().await.push(reference.clone());
        Ok(self.push_raw(reference.to_body()).await)
    }

    async fn receive_batch(&self, max: usize) -> Result<Vec<ReceivedMessage>, MurmurError> {
        if self.fail_receive.load(Ordering::SeqCst) {
            return Err(injected("receive"));
        }
        let mut visible = self.visible.lock().await;
        let mut in_flight = self.in_flight.lock().await;
        let take = max.min(visible.len());
        let batch: Vec<ReceivedMessage> = visible
            .drain(..take)
            .map(|mut m| {
                m.receive_count += 1;
                in_flight.insert(m.message_id.clone(), m.clone());
                m
            })
            .collect();
        Ok(batch)
    }

    async fn ack(&self, message_id: &MessageId) -> Result<(), MurmurError> {
        if self.fail_ack.load(Ordering::SeqCst) {
            return Err(injected("ack"));
        }
        self.in_flight.lock().await.remove(message_id);
        self.acked.lock().await.push(message_id.clone());
        Ok(())
    }
}
