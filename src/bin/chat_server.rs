//! chat-server - serve the chat application over HTTP.

use chat_probe::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting chat server...");

    let config = ServerConfig::from_env()?;
    let app = Arc::new(chat_app()?);

    for (method, path) in app.routes() {
        tracing::info!("Route: {} {}", method, path);
    }
    tracing::info!(
        "Try: curl -X POST -H 'Content-Type: application/json' -d '{{\"message\":\"hi\"}}' http://localhost:{}/chat",
        config.port
    );

    AppServer::new(config, app).run().await
}
