// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the submission service.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use murmur_core::{FeedbackStatus, QueueReference};
use murmur_ingest::{NewFeedback, SubmissionService};
use murmur_test_utils::{MockQueue, MockStore};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn every_valid_submission_yields_a_fresh_pending_record(
        description in "[a-zA-Z0-9 ]{1,64}",
        score in proptest::option::of(0u8..=10),
        submitter in proptest::option::of("[a-z0-9-]{1,16}"),
    ) {
        let rt = runtime();
        let (record, sent, stored) = rt.block_on(async {
            let store = Arc::new(MockStore::new());
            let queue = Arc::new(MockQueue::new());
            let service = SubmissionService::new(store.clone(), Some(queue.clone()));
            let record = service
                .submit(NewFeedback {
                    description: Some(description.clone()),
                    score,
                    submitter_id: submitter.clone(),
                })
                .await
                .unwrap();
            let stored = store.record(&record.id).await;
            (record, queue.sent().await, stored)
        });

        prop_assert!(!record.id.as_str().is_empty());
        prop_assert_eq!(record.status, FeedbackStatus::Pending);
        prop_assert!(chrono::DateTime::parse_from_rfc3339(&record.submitted_at).is_ok());
        prop_assert_eq!(record.description.as_deref(), Some(description.as_str()));
        prop_assert_eq!(record.score, score);
        prop_assert_eq!(record.submitter_id.clone(), submitter);
        prop_assert_eq!(stored, Some(record.clone()));
        prop_assert_eq!(sent, vec![QueueReference::new(record.id.clone())]);
    }
}

#[tokio::test]
async fn ids_are_unique_across_submissions() {
    let store = Arc::new(MockStore::new());
    let service = SubmissionService::new(store.clone(), None);
    let mut ids = HashSet::new();
    for _ in 0..200 {
        let record = service.submit(NewFeedback::default()).await.unwrap();
        assert!(ids.insert(record.id));
    }
    assert_eq!(store.len().await, 200);
}
