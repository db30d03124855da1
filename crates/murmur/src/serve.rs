// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `murmur serve` and `murmur worker`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use murmur_config::model::MurmurConfig;
use murmur_core::MurmurError;
use murmur_gateway::{GatewayState, HealthState, ServerConfig};
use murmur_prometheus::PrometheusAdapter;

use crate::pipeline::Pipeline;
use crate::shutdown;

/// Runs the gateway, plus the consumer when enabled and a queue is configured.
pub async fn run_serve(config: MurmurConfig) -> Result<(), MurmurError> {
    init_tracing(&config.service.log_level);
    info!(name = %config.service.name, "starting murmur serve");

    let prometheus = match PrometheusAdapter::new() {
        Ok(adapter) => Some(Arc::new(adapter)),
        Err(e) => {
            warn!(error = %e, "metrics disabled");
            None
        }
    };

    let pipeline = Pipeline::build(&config).await?;
    let cancel = shutdown::install_signal_handler();

    let consumer_task = if config.processor.enabled {
        match pipeline.consumer() {
            Some(consumer) => {
                let cancel = cancel.clone();
                Some(tokio::spawn(async move { consumer.run(cancel).await }))
            }
            None => {
                warn!("processor enabled but no queue endpoint configured, consumer not started");
                None
            }
        }
    } else {
        info!("processor disabled");
        None
    };

    let mut health = HealthState::new(pipeline.adapters());
    if let Some(prometheus) = prometheus {
        health = health.with_prometheus_render(Arc::new(move || prometheus.render()));
    }
    let state = GatewayState::new(
        pipeline.submissions.clone(),
        &config.gateway.identity_header,
        health,
    )?;
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let served = murmur_gateway::start_server(&server_config, state, cancel.clone()).await;
    // A bind failure returns before any signal; stop the consumer too.
    cancel.cancel();

    if let Some(task) = consumer_task {
        if let Err(e) = task.await {
            warn!(error = %e, "consumer task failed");
        }
    }
    pipeline.shutdown().await;

    served?;
    info!("murmur serve shutdown complete");
    Ok(())
}

/// Runs the consumer alone.
pub async fn run_worker(config: MurmurConfig) -> Result<(), MurmurError> {
    if config.queue.endpoint().is_none() {
        return Err(MurmurError::Config(
            "murmur worker requires queue.endpoint to be set".to_string(),
        ));
    }
    init_tracing(&config.service.log_level);

    info!(name = %config.service.name, "starting murmur worker");
    let pipeline = Pipeline::build(&config).await?;
    let consumer = pipeline.consumer().ok_or_else(|| {
        MurmurError::Internal("queue configured but consumer unavailable".to_string())
    })?;

    let cancel: CancellationToken = shutdown::install_signal_handler();
    consumer.run(cancel).await;

    pipeline.shutdown().await;
    info!("murmur worker shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("murmur={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
