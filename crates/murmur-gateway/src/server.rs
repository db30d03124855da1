// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router construction and the HTTP server lifecycle.

use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderName;
use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use murmur_core::{MurmurError, PluginAdapter};
use murmur_ingest::SubmissionService;

use crate::handlers;

/// Bind address of the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `127.0.0.1`.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
}

/// Inputs for `GET /health` and `GET /metrics`.
#[derive(Clone)]
pub struct HealthState {
    /// When the gateway state was built; drives `uptime_secs`.
    pub start_time: Instant,
    /// Adapters whose `health_check` is aggregated.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
    /// Renders Prometheus text. `None` when no recorder is installed.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl HealthState {
    pub fn new(adapters: Vec<Arc<dyn PluginAdapter>>) -> Self {
        Self {
            start_time: Instant::now(),
            adapters,
            prometheus_render: None,
        }
    }

    pub fn with_prometheus_render(
        mut self,
        render: Arc<dyn Fn() -> String + Send + Sync>,
    ) -> Self {
        self.prometheus_render = Some(render);
        self
    }
}

/// Shared state of every route.
#[derive(Clone)]
pub struct GatewayState {
    /// Handles `POST /v1/feedback`.
    pub submissions: Arc<SubmissionService>,
    /// Header carrying the caller identity, lowercased.
    pub identity_header: HeaderName,
    /// Inputs for the health and metrics routes.
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(
        submissions: Arc<SubmissionService>,
        identity_header: &str,
        health: HealthState,
    ) -> Result<Self, MurmurError> {
        let identity_header = HeaderName::try_from(identity_header.trim().to_ascii_lowercase())
            .map_err(|e| {
                MurmurError::Config(format!(
                    "gateway.identity_header `{identity_header}` is not a header name: {e}"
                ))
            })?;
        Ok(Self {
            submissions,
            identity_header,
            health,
        })
    }
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/feedback", post(handlers::post_feedback))
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until `cancel` fires, then drain in-flight requests.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), MurmurError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MurmurError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!(addr = %addr, "gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| MurmurError::Internal(format!("gateway server error: {e}")))?;

    info!("gateway stopped");
    Ok(())
}
