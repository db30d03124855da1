// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Murmur feedback pipeline.
//!
//! One WAL-mode database file holds both the feedback records and the
//! reference queue. Access is serialized through `tokio-rusqlite`, and the
//! fixed schema is managed by embedded refinery migrations.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod queue_adapter;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use queue_adapter::{QueueOptions, SqliteQueue};
