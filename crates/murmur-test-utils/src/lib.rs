// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Murmur integration tests.
//!
//! In-memory implementations of the adapter traits with fault injection,
//! for fast deterministic tests without SQLite or SMTP.
//!
//! # Components
//!
//! - [`MockStore`] - record store with per-id and global read failures
//! - [`MockQueue`] - queue that captures sends and tracks acknowledgements
//! - [`MockNotifier`] - notification channel that captures alerts

pub mod mock_notifier;
pub mod mock_queue;
pub mod mock_store;

pub use mock_notifier::{MockNotifier, NotifierFailure};
pub use mock_queue::MockQueue;
pub use mock_store::MockStore;
