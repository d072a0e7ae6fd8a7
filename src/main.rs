//! chat-probe - send one message to `/chat` in-process and print the result.
//!
//! The report goes to stdout. Logs go to stderr and are quiet unless
//! `RUST_LOG` asks for more.

use chat_probe::prelude::*;
use chat_probe::probe;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let app = Arc::new(chat_app()?);
    let client = TestClient::new(app);

    let mut stdout = std::io::stdout().lock();
    probe::run(&client, &mut stdout).await?;

    Ok(())
}
