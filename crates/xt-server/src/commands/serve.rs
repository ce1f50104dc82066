//! `xt serve`: runs the HTTP API until interrupted.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use xt_core::Store;

use crate::Config;
use crate::api::{self, AppState};

/// Serves the API on the configured address, blocking until Ctrl-C.
pub fn run(config: &Config, store: Box<dyn Store + Send>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(serve(config, store))
}

async fn serve(config: &Config, store: Box<dyn Store + Send>) -> Result<()> {
    let state = AppState::new(store, config.error_style);
    let app = api::router(state, config.static_dir.as_deref());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, error_style = ?config.error_style, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
