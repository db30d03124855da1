// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of the Murmur pipeline, shared by the `murmur` binary and its tests.

pub mod pipeline;
pub mod serve;
pub mod shutdown;

pub use pipeline::Pipeline;
