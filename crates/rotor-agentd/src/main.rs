use std::sync::Arc;

use anyhow::Context;
use axum::{http::StatusCode, routing::get};
use rotor_api::{HttpApi, ManagerAdapter};
use rotor_core::TaskManager;
use rotor_observe::{LoggerConfig, logger_init};
use rotor_prometheus::PrometheusMetrics;
use rotor_remote::GraphCommentOperation;
use tracing::{error, info};

mod config;
use config::AgentConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Config + logger
    let cfg = AgentConfig::from_env()?;
    logger_init(&LoggerConfig::new(cfg.log_format, cfg.log_level.clone()))?;
    info!(?cfg, "config loaded");

    // 2) Remote operation + metrics
    let remote =
        GraphCommentOperation::new(cfg.graph_config()).context("building graph client")?;
    let metrics = PrometheusMetrics::new().context("registering metrics")?;

    // 3) Manager
    let manager = TaskManager::builder(Arc::new(remote))
        .with_config(cfg.manager_config())
        .with_metrics(Arc::new(metrics.clone()))
        .build();
    info!("task manager ready");

    // 4) HTTP
    let app = HttpApi::new(Arc::new(ManagerAdapter::new(manager.clone())))
        .router()
        .route(
            "/metrics",
            get(move || {
                let metrics = metrics.clone();
                async move {
                    metrics.render().map_err(|e| {
                        error!(error = %e, "metrics encoding failed");
                        StatusCode::INTERNAL_SERVER_ERROR
                    })
                }
            }),
        );

    let addr = cfg.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "http api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "ctrl-c handler failed");
            }
            info!("shutting down...");
        })
        .await
        .context("http server")?;

    manager.shutdown();
    info!("stopped");
    Ok(())
}
