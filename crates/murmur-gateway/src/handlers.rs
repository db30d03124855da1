// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use murmur_core::types::MAX_SCORE;
use murmur_core::HealthStatus;
use murmur_ingest::NewFeedback;

use crate::identity::Submitter;
use crate::server::GatewayState;

/// Body of `POST /v1/feedback`.
///
/// The score is taken as a wide integer so an out-of-range value is a
/// validation error rather than a parse error.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// Free text. Required and not blank.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional score, 0 to 10 inclusive.
    #[serde(default)]
    pub score: Option<i64>,
}

impl FeedbackRequest {
    /// Check the request and convert it, collecting every problem found.
    pub fn validate(self, submitter: Option<String>) -> Result<NewFeedback, Vec<String>> {
        let mut details = Vec::new();

        let description = self
            .description
            .filter(|d| !d.trim().is_empty());
        if description.is_none() {
            details.push("description must not be blank".to_string());
        }

        let score = match self.score {
            None => None,
            Some(s) => match u8::try_from(s) {
                Ok(s) if s <= MAX_SCORE => Some(s),
                _ => {
                    details.push(format!("score must be between 0 and {MAX_SCORE}, got {s}"));
                    None
                }
            },
        };

        if !details.is_empty() {
            return Err(details);
        }
        Ok(NewFeedback {
            description,
            score,
            submitter_id: submitter,
        })
    }
}

/// Error body of every non-2xx response with content.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short summary of the failure.
    pub error: String,
    /// Individual problems, one per invalid field. May be empty.
    pub details: Vec<String>,
}

fn error_response(status: StatusCode, error: &str, details: Vec<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
        .into_response()
}

/// POST /v1/feedback
pub async fn post_feedback(
    State(state): State<GatewayState>,
    Submitter(submitter): Submitter,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid request body",
                vec![rejection.body_text()],
            );
        }
    };

    let feedback = match request.validate(submitter) {
        Ok(feedback) => feedback,
        Err(details) => {
            return error_response(StatusCode::BAD_REQUEST, "validation failed", details);
        }
    };

    match state.submissions.submit(feedback).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to store feedback");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to store feedback",
                Vec::new(),
            )
        }
    }
}

/// Health of one adapter as reported by `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Adapter name, e.g. `sqlite`.
    pub name: String,
    /// `healthy`, `degraded` or `unhealthy`.
    pub status: String,
    /// Why the adapter is not healthy. Omitted when healthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every component is healthy, `degraded` otherwise.
    pub status: String,
    /// Crate version of the running gateway.
    pub version: String,
    /// Seconds since the gateway state was built.
    pub uptime_secs: u64,
    /// One entry per checked adapter.
    pub components: Vec<ComponentHealth>,
}

/// GET /health
///
/// Always 200. The status is `degraded` when any adapter is not healthy
/// or its check failed.
pub async fn get_health(State(state): State<GatewayState>) -> impl IntoResponse {
    let mut components = Vec::with_capacity(state.health.adapters.len());
    for adapter in &state.health.adapters {
        let (status, reason) = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => ("healthy", None),
            Ok(HealthStatus::Degraded(reason)) => ("degraded", Some(reason)),
            Ok(HealthStatus::Unhealthy(reason)) => ("unhealthy", Some(reason)),
            Err(e) => ("unhealthy", Some(e.to_string())),
        };
        if let Some(reason) = &reason {
            warn!(adapter = adapter.name(), status, reason = %reason, "adapter not healthy");
        }
        components.push(ComponentHealth {
            name: adapter.name().to_string(),
            status: status.to_string(),
            reason,
        });
    }

    let overall = if components.iter().all(|c| c.status == "healthy") {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: overall.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        components,
    })
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
