// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Murmur pipeline.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod notification;
pub mod queue;
pub mod store;

pub use adapter::PluginAdapter;
pub use notification::NotificationChannel;
pub use queue::FeedbackQueue;
pub use store::RecordStore;
