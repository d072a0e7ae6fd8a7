//! # chat-probe
//!
//! In-process smoke probe for the chat backend.
//!
//! The crate carries the chat application itself (a small router with the
//! `POST /chat` endpoint), a hyper server to expose it, and an in-process
//! [`TestClient`] that drives the same request pipeline without a socket.
//! The `chat-probe` binary uses the client to send one fixed message and
//! print what came back.
//!
//! ## Architecture
//!
//! ```text
//!   chat-probe ──► TestClient ──┐
//!                               ├──► runtime::pipeline::dispatch ──► Router ──► ChatHandler
//!   chat-server ─► AppServer ───┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chat_probe::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = TestClient::new(Arc::new(chat_app()?));
//!     let response = client
//!         .post_json("/chat", &serde_json::json!({ "message": "hi" }))
//!         .await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod http;
pub mod probe;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::app::{chat_app, AppError, Handler, RequestContext, Router};
    pub use crate::client::{ClientError, TestClient, TestResponse};
    pub use crate::http::{AppRequest, AppResponse, Method, StatusCode};
    pub use crate::probe::ProbeError;
    pub use crate::runtime::{AppServer, ServerConfig};
    pub use async_trait::async_trait;
}

pub use app::{chat_app, AppError, Handler, Router};
pub use client::{ClientError, TestClient, TestResponse};
pub use http::{AppRequest, AppResponse};
pub use probe::ProbeError;
pub use runtime::{AppServer, ServerConfig};
