//! Response type produced by application handlers.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;

/// Numeric HTTP status. Values outside hyper's range are replaced with `500`
/// when the response is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
    pub const UNPROCESSABLE_ENTITY: StatusCode = StatusCode(422);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

/// Status, headers and an optional body, as returned by a handler.
#[derive(Debug, Clone)]
pub struct AppResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    /// `None` is written as an empty body.
    pub body: Option<Bytes>,
}

impl AppResponse {
    /// Bare response with no headers and no body.
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// `200` with `data` serialized as JSON.
    pub fn json<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Self::json_with_status(StatusCode::OK, data)
    }

    /// JSON body under an explicit status, used for `{"detail": ..}` errors.
    pub fn json_with_status<T: Serialize>(
        status: impl Into<StatusCode>,
        data: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(data)?;
        Ok(Self::new(status)
            .header("Content-Type", "application/json")
            .body(body))
    }

    /// `200` with a plain-text body.
    pub fn text(content: impl Into<String>) -> Self {
        Self::plain(StatusCode::OK, content)
    }

    /// Plain-text body under an explicit status.
    pub fn plain(status: impl Into<StatusCode>, message: impl Into<String>) -> Self {
        Self::new(status)
            .header("Content-Type", "text/plain")
            .body(message.into())
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}
