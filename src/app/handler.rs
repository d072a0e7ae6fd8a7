//! Handler trait, per-request context and handler error type.

use crate::http::{AppRequest, AppResponse};
use async_trait::async_trait;
use std::collections::HashMap;

/// Execution context handed to a handler for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Application-wide environment values.
    pub env: HashMap<String, String>,
    /// Request ID for tracing.
    pub request_id: String,
}

impl RequestContext {
    /// Create a context for one request.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            env: HashMap::new(),
            request_id: request_id.into(),
        }
    }

    /// Add an environment value.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Get an environment value.
    pub fn get_env(&self, key: &str) -> Option<&String> {
        self.env.get(key)
    }
}

/// An endpoint of the application.
///
/// Handlers are shared between concurrent requests, so they take `&self`
/// and must be `Send + Sync`.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle one request.
    async fn handle(
        &self,
        request: AppRequest,
        ctx: &RequestContext,
    ) -> Result<AppResponse, AppError>;

    /// Name used in logs and in the request context.
    fn name(&self) -> &str;
}

/// Error raised by a handler or by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    /// Error message.
    pub message: String,
    /// HTTP status code the error maps to.
    pub code: u16,
}

impl AppError {
    /// Create a new 500 error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 500,
        }
    }

    /// Create an error with a specific code.
    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

impl From<AppError> for AppResponse {
    fn from(err: AppError) -> Self {
        AppResponse::plain(err.code, err.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::new(format!("failed to encode response: {}", err))
    }
}
