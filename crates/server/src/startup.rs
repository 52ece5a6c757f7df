use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{routes, state::AppState};
use service::storage::open_store;

/// The dashboard front end is served from another origin.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `host:port` from the validated server section.
fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(cfg.server.bind_addr().parse()?)
}

/// Open storage, build the router and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // Storage backend (file or mongo) chosen by config
    let store = open_store(&cfg.storage).await?;
    // Both services share the one store handle
    let state = AppState::new(store, &cfg.storage);

    // Build router
    let app: Router = routes::build_router(state, build_cors());

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, backend = ?cfg.storage.backend, "dashboard api listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        // without a signal handler, run until the process is killed
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}
