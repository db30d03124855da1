// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Processing side of the Murmur pipeline.
//!
//! [`BatchProcessor`] turns a batch of queue messages into handled outcomes,
//! stopping at the first infrastructure failure. [`QueueConsumer`] drives it
//! from a [`murmur_core::FeedbackQueue`] and acknowledges what was handled.

pub mod alert;
pub mod processor;
pub mod worker;

pub use processor::{BatchAborted, BatchProcessor, BatchReport, HandledMessage, MessageOutcome};
pub use worker::{PollOutcome, QueueConsumer};
