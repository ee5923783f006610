//! HTTP server for quill (axum).
//!
//! Listens on http://127.0.0.1:8000 by default and exposes the four text operations under
//! `/llm/` plus `GET /health`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`run_serve_with_settings`],
//! [`router`], [`ServeSettings`].

mod app;
mod error;
mod routes;
mod settings;

pub use app::router;
pub use settings::{ServeSettings, DEFAULT_ADDR, DEFAULT_CORS_ORIGINS, DEFAULT_MAX_BODY_BYTES};

use quill::Pipeline;
use tokio::net::TcpListener;
use tracing::info;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

/// Serves on an existing listener until Ctrl-C. Tests bind `127.0.0.1:0` and pass the listener.
pub async fn run_serve_with_settings(
    listener: TcpListener,
    pipeline: Pipeline,
    settings: &ServeSettings,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("HTTP server listening on http://{}", addr);
    let app = router(pipeline, settings);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

/// Like [`run_serve_with_settings`], with [`ServeSettings::from_env`].
pub async fn run_serve_on_listener(
    listener: TcpListener,
    pipeline: Pipeline,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    run_serve_with_settings(listener, pipeline, &ServeSettings::from_env()).await
}

/// Binds `addr` (default `QUILL_ADDR`, else 127.0.0.1:8000) and serves until Ctrl-C.
pub async fn run_serve(
    addr: Option<&str>,
    pipeline: Pipeline,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = ServeSettings::from_env();
    let addr = addr.unwrap_or(settings.addr.as_str());
    let listener = TcpListener::bind(addr).await?;
    run_serve_with_settings(listener, pipeline, &settings).await
}
