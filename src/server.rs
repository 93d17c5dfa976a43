use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{DEFAULT_API_URL, DEFAULT_PROXY_PORT};
use crate::proxy::{ProxyState, SharedProxy, proxy_router};

/// Configuration for the proxy server.
pub struct ServerConfig {
    pub port: u16,
    pub backend_url: String,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PROXY_PORT,
            backend_url: DEFAULT_API_URL.to_string(),
            dev_mode: false,
        }
    }
}

async fn health_check() -> &'static str {
    "ok"
}

/// Build the full application router: proxy routes plus `/health`.
pub fn build_router(state: SharedProxy) -> Router {
    proxy_router()
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the proxy server and run until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let state = ProxyState::new(&config.backend_url)?;
    let mut app = build_router(state);

    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let host = if config.dev_mode { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, backend = %config.backend_url, "proxy listening");
    println!(
        "Trellis proxy running at http://{} -> {}",
        local_addr, config.backend_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    println!("\nShutting down...");
}
