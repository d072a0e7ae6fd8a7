//! The `POST /chat` endpoint.
//!
//! Accepts `{"message": "..."}` and answers `{"reply": "..."}`. Payloads that
//! cannot be read as a chat message are answered with `422` and a
//! `{"detail": "..."}` body.

use crate::app::handler::{AppError, Handler, RequestContext};
use crate::app::router::detail_response;
use crate::http::{AppRequest, AppResponse, StatusCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Path the chat endpoint is mounted on.
pub const CHAT_PATH: &str = "/chat";

/// Incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Built-in chat responder. Echoes the message back.
#[derive(Debug, Clone, Default)]
pub struct ChatHandler;

impl ChatHandler {
    pub fn new() -> Self {
        Self
    }

    fn compose_reply(&self, message: &str) -> String {
        format!("You said: {}", message)
    }
}

#[async_trait]
impl Handler for ChatHandler {
    async fn handle(
        &self,
        request: AppRequest,
        ctx: &RequestContext,
    ) -> Result<AppResponse, AppError> {
        let chat: ChatRequest = match request.json() {
            None => {
                return Ok(detail_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "request body is required",
                ))
            }
            Some(Err(e)) => {
                debug!("Rejecting chat payload: {} [{}]", e, ctx.request_id);
                return Ok(detail_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    e.to_string(),
                ));
            }
            Some(Ok(chat)) => chat,
        };

        let message = chat.message.trim();
        if message.is_empty() {
            return Ok(detail_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "message must not be blank",
            ));
        }

        debug!("Chat message of {} bytes [{}]", message.len(), ctx.request_id);
        let reply = ChatReply {
            reply: self.compose_reply(message),
        };
        Ok(AppResponse::json(&reply)?)
    }

    fn name(&self) -> &str {
        "chat"
    }
}
