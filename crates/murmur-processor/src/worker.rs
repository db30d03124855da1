// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Polling consumer loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use murmur_core::{FeedbackQueue, MurmurError};

use crate::processor::{BatchAborted, BatchProcessor, BatchReport, HandledMessage};

/// What one poll did.
#[derive(Debug)]
pub enum PollOutcome {
    /// Nothing was visible.
    Empty,
    /// Every received message was handled and acknowledged.
    Completed(BatchReport),
    /// The batch stopped early; only the handled prefix was acknowledged.
    Aborted(BatchAborted),
}

/// Pulls batches from the queue, processes them and acks handled messages.
pub struct QueueConsumer {
    queue: Arc<dyn FeedbackQueue>,
    processor: BatchProcessor,
    batch_size: usize,
    poll_interval: Duration,
}

impl QueueConsumer {
    pub fn new(
        queue: Arc<dyn FeedbackQueue>,
        processor: BatchProcessor,
        batch_size: usize,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            processor,
            batch_size,
            poll_interval,
        }
    }

    /// Receive one batch, process it and ack what was handled.
    ///
    /// `Err` only when receiving failed.
    pub async fn poll_once(&self) -> Result<PollOutcome, MurmurError> {
        let messages = self.queue.receive_batch(self.batch_size).await?;
        if messages.is_empty() {
            return Ok(PollOutcome::Empty);
        }
        debug!(count = messages.len(), "received batch");

        match self.processor.process_batch(&messages).await {
            Ok(report) => {
                self.ack_all(&report.handled).await;
                Ok(PollOutcome::Completed(report))
            }
            Err(aborted) => {
                self.ack_all(&aborted.handled).await;
                Ok(PollOutcome::Aborted(aborted))
            }
        }
    }

    // A failed ack only means the message comes back and is handled again.
    async fn ack_all(&self, handled: &[HandledMessage]) {
        for message in handled {
            if let Err(e) = self.queue.ack(&message.message_id).await {
                warn!(message_id = %message.message_id, error = %e, "failed to ack handled message");
            }
        }
    }

    /// Poll until `cancel` fires. A batch in progress is always finished.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            batch_size = self.batch_size,
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "queue consumer started"
        );

        while !cancel.is_cancelled() {
            let idle = match self.poll_once().await {
                Ok(PollOutcome::Completed(report)) => {
                    debug!(handled = report.handled.len(), notified = report.notified(), "batch processed");
                    false
                }
                Ok(PollOutcome::Empty) => true,
                Ok(PollOutcome::Aborted(_)) => true,
                Err(e) => {
                    warn!(error = %e, "failed to receive from queue");
                    true
                }
            };

            if idle {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.poll_interval) => {}
                }
            }
        }

        info!("queue consumer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::{FeedbackId, FeedbackRecord, FeedbackStatus, MessageId, QueueReference};
    use murmur_test_utils::{MockNotifier, MockQueue, MockStore};

    fn record(id: &str, score: Option<u8>) -> FeedbackRecord {
        FeedbackRecord {
            id: FeedbackId(id.into()),
            description: Some("d".into()),
            score,
            status: FeedbackStatus::Pending,
            submitted_at: "2026-03-01T10:00:00.000Z".into(),
            submitter_id: None,
        }
    }

    struct Fixture {
        consumer: QueueConsumer,
        queue: Arc<MockQueue>,
        store: Arc<MockStore>,
        notifier: Arc<MockNotifier>,
    }

    async fn fixture(batch_size: usize) -> Fixture {
        let queue = Arc::new(MockQueue::new());
        let store = Arc::new(MockStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let processor = BatchProcessor::new(store.clone(), notifier.clone(), "admin@example.com");
        let consumer = QueueConsumer::new(
            queue.clone(),
            processor,
            batch_size,
            Duration::from_millis(100),
        );
        Fixture {
            consumer,
            queue,
            store,
            notifier,
        }
    }

    async fn enqueue(queue: &MockQueue, id: &str) -> MessageId {
        queue
            .send(&QueueReference::new(FeedbackId(id.into())))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_queue_polls_empty() {
        let f = fixture(10).await;
        assert!(matches!(f.consumer.poll_once().await.unwrap(), PollOutcome::Empty));
    }

    #[tokio::test]
    async fn completed_batch_acks_every_message() {
        let f = fixture(10).await;
        f.store.insert(record("a", Some(1))).await;
        f.store.insert(record("b", Some(8))).await;
        let ids = vec![enqueue(&f.queue, "a").await, enqueue(&f.queue, "b").await];

        let outcome = f.consumer.poll_once().await.unwrap();
        assert!(matches!(outcome, PollOutcome::Completed(ref r) if r.handled.len() == 2));
        assert_eq!(f.queue.acked().await, ids);
        assert_eq!(f.queue.in_flight_count().await, 0);
        assert_eq!(f.notifier.sent_count().await, 1);
    }

    #[tokio::test]
    async fn aborted_batch_acks_prefix_and_redelivers_rest() {
        let f = fixture(10).await;
        for id in ["a", "b", "c"] {
            f.store.insert(record(id, Some(6))).await;
        }
        let first = enqueue(&f.queue, "a").await;
        enqueue(&f.queue, "b").await;
        enqueue(&f.queue, "c").await;
        f.store.fail_reads_for(&FeedbackId("b".into())).await;

        let outcome = f.consumer.poll_once().await.unwrap();
        assert!(matches!(outcome, PollOutcome::Aborted(_)));
        assert_eq!(f.queue.acked().await, vec![first]);
        assert_eq!(f.queue.in_flight_count().await, 2);

        // Redelivered messages are handled once the store is reachable again.
        let recovered = Arc::new(MockStore::new());
        for id in ["b", "c"] {
            recovered.insert(record(id, Some(6))).await;
        }
        let consumer = QueueConsumer::new(
            f.queue.clone(),
            BatchProcessor::new(recovered, f.notifier.clone(), "admin@example.com"),
            10,
            Duration::from_millis(100),
        );
        f.queue.redeliver_unacked().await;
        let again = consumer.poll_once().await.unwrap();
        assert!(matches!(again, PollOutcome::Completed(ref r) if r.handled.len() == 2));
        assert_eq!(f.queue.acked().await.len(), 3);
    }

    #[tokio::test]
    async fn batch_size_limits_each_poll() {
        let f = fixture(2).await;
        for id in ["a", "b", "c"] {
            f.store.insert(record(id, None)).await;
            enqueue(&f.queue, id).await;
        }
        f.consumer.poll_once().await.unwrap();
        assert_eq!(f.queue.acked().await.len(), 2);
        assert_eq!(f.queue.visible_count().await, 1);
    }

    #[tokio::test]
    async fn receive_failure_is_an_error() {
        let f = fixture(10).await;
        f.queue.set_fail_receive(true);
        assert!(f.consumer.poll_once().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn run_drains_queue_and_stops_on_cancel() {
        let f = fixture(1).await;
        for id in ["a", "b"] {
            f.store.insert(record(id, Some(0))).await;
            enqueue(&f.queue, id).await;
        }
        let consumer = Arc::new(f.consumer);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let consumer = consumer.clone();
            let cancel = cancel.clone();
            async move { consumer.run(cancel).await }
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(f.queue.acked().await.len(), 2);
        assert_eq!(f.notifier.sent_count().await, 2);
    }
}
