//! In-process test client.
//!
//! [`TestClient`] builds real `hyper::Request` values and feeds them through
//! the same pipeline the server uses, without opening a socket. Handler
//! failures are raised to the caller by default instead of being rendered as
//! `500` responses, so a broken endpoint fails loudly.

use crate::app::{AppError, Router};
use crate::http::{AppRequest, Method, StatusCode};
use crate::runtime::pipeline::{build_response, dispatch, generate_request_id};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Request;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Host header sent by the test client.
pub const TEST_HOST: &str = "testserver";

/// Default body limit, same as the server's default.
const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Error raised by the test client.
#[derive(Debug)]
pub enum ClientError {
    /// The request payload could not be serialized.
    Encode(serde_json::Error),
    /// The request could not be built or the response body could not be read.
    Transport(String),
    /// The application raised an error while handling the request.
    Application(AppError),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Encode(e) => write!(f, "failed to encode request body: {}", e),
            ClientError::Transport(msg) => write!(f, "transport error: {}", msg),
            ClientError::Application(e) => write!(f, "application error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Encode(e) => Some(e),
            ClientError::Transport(_) => None,
            ClientError::Application(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Encode(err)
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        ClientError::Application(err)
    }
}

/// Response observed by the test client.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl TestResponse {
    /// Numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.0
    }

    /// Status as a [`StatusCode`].
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get a header value by lowercase name.
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_ascii_lowercase())
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as text. Invalid UTF-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Decode the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Client bound to an application instance.
#[derive(Clone)]
pub struct TestClient {
    app: Arc<Router>,
    raise_app_errors: bool,
    max_body_size: usize,
}

impl TestClient {
    /// Bind a client to an application.
    pub fn new(app: Arc<Router>) -> Self {
        Self {
            app,
            raise_app_errors: true,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// When `false`, handler errors are rendered as error responses the way
    /// the server renders them instead of being returned as `Err`.
    pub fn raise_app_errors(mut self, raise: bool) -> Self {
        self.raise_app_errors = raise;
        self
    }

    /// Issue a GET request.
    pub async fn get(&self, path: &str) -> Result<TestResponse, ClientError> {
        self.request(AppRequest::new(Method::Get, path)).await
    }

    /// Issue a POST with `payload` serialized as the JSON body.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<TestResponse, ClientError> {
        let body = serde_json::to_vec(payload)?;
        let request = AppRequest::new(Method::Post, path)
            .header("Content-Type", "application/json")
            .body(body);
        self.request(request).await
    }

    /// Issue an arbitrary request.
    pub async fn request(&self, request: AppRequest) -> Result<TestResponse, ClientError> {
        let request_id = generate_request_id();

        let mut builder = Request::builder()
            .method(hyper::Method::from(request.method))
            .uri(request.path.as_str())
            .header(hyper::header::HOST, TEST_HOST);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let req = builder
            .body(Full::new(request.body.unwrap_or_default()))
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        debug!("Test client {} {} [{}]", request.method, request.path, request_id);

        let response = match dispatch(&self.app, req, self.max_body_size, &request_id).await {
            Ok(response) => response,
            Err(e) if self.raise_app_errors => return Err(ClientError::Application(e)),
            Err(e) => build_response(e.into()),
        };

        let (parts, body) = response.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(never) => match never {},
        };

        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Ok(TestResponse {
            status: StatusCode(parts.status.as_u16()),
            headers,
            body,
        })
    }
}
