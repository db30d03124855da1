// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission side of the Murmur pipeline.
//!
//! [`SubmissionService`] persists a new feedback record and then, best
//! effort, enqueues a reference to it for the batch consumer.

pub mod service;

pub use service::{NewFeedback, SubmissionService};
