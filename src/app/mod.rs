//! The chat application: handlers, routing and the default route table.

pub mod chat;
pub mod handler;
pub mod router;

pub use chat::{ChatHandler, ChatReply, ChatRequest, CHAT_PATH};
pub use handler::{AppError, Handler, RequestContext};
pub use router::Router;

use crate::http::Method;
use std::sync::Arc;

/// Build the application with its default routes mounted.
pub fn chat_app() -> Result<Router, AppError> {
    let mut router = Router::new();
    router.route(Method::Post, CHAT_PATH, Arc::new(ChatHandler::new()))?;
    Ok(router)
}
