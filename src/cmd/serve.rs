//! Proxy server command: `trellis serve`.

use anyhow::Result;
use trellis::server::{ServerConfig, start_server};

pub async fn cmd_serve(port: u16, backend_url: String, open: bool, dev: bool) -> Result<()> {
    // Spawn browser open before starting the server (which blocks)
    if open && !dev {
        let url = format!("http://localhost:{}/health", port);
        tokio::spawn(async move {
            // Small delay to let the server start binding
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                tracing::warn!(error = %e, "failed to open browser");
            }
        });
    }

    start_server(ServerConfig {
        port,
        backend_url,
        dev_mode: dev,
    })
    .await
}
