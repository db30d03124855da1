// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Murmur feedback pipeline.
//!
//! Routes:
//! - `POST /v1/feedback` validates a submission and hands it to the
//!   [`murmur_ingest::SubmissionService`]
//! - `GET /health` aggregates adapter health checks
//! - `GET /metrics` renders Prometheus text when a recorder is installed
//!
//! The caller identity is taken from a header set by whatever sits in front
//! of the gateway. The gateway never authenticates on its own.

pub mod handlers;
pub mod identity;
pub mod server;

pub use identity::Submitter;
pub use server::{router, start_server, GatewayState, HealthState, ServerConfig};
