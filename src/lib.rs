pub mod api;
pub mod background;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;

use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use crate::api::router::create_router;
use crate::background::start_background_worker;
use crate::config::Config;
use crate::infra::factory::bootstrap_state;

const LOG_FILE_PREFIX: &str = "villa-ops.log";
const FILE_LOG_DIRECTIVES: &str = "info,villa_ops=debug,sqlx=warn";

/// Human-readable console output filtered by `RUST_LOG`, plus a daily rolling
/// JSON file in `log_dir` that always keeps this crate's debug events.
/// The returned guard flushes the file writer on drop.
pub fn init_logging(log_dir: &str) -> WorkerGuard {
    let (file_writer, guard) = tracing_appender::non_blocking(
        tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX),
    );

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let json_file = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new(FILE_LOG_DIRECTIVES));

    tracing_subscriber::registry()
        .with(console)
        .with(json_file)
        .init();

    info!(log_dir, "Structured logs enabled");
    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, draining in-flight requests");
}

/// Loads configuration, wires storage and the channel manager, starts the
/// housekeeping worker and serves the admin API until Ctrl-C.
pub async fn run() {
    let config = Config::from_env();
    let _log_guard = init_logging(&config.log_dir);

    let state = Arc::new(bootstrap_state(&config).await);
    let worker = tokio::spawn(start_background_worker(state.clone()));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", addr, e));
    info!("villa-ops listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");

    worker.abort();
    info!("villa-ops stopped");
}
