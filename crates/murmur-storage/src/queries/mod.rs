// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed SQL operations on the feedback table and the reference queue.

pub mod feedback;
pub mod queue;
