// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller identity extraction.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::server::GatewayState;

/// The identity asserted for the caller, if any.
///
/// Read from the configured identity header. A missing, blank or non-UTF-8
/// header means an anonymous submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitter(pub Option<String>);

impl FromRequestParts<GatewayState> for Submitter {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(&state.identity_header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(Submitter(id))
    }
}
