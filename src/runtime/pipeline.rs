//! Conversion between hyper messages and application messages.
//!
//! The server and the in-process test client both go through [`dispatch`],
//! so a request handled in a test takes the same path as one read off a
//! socket.

use crate::app::{AppError, Router};
use crate::app::router::detail_response;
use crate::http::{AppRequest, AppResponse, Method, StatusCode};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Request, Response};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Reason a hyper request could not become an [`AppRequest`].
#[derive(Debug)]
enum RejectReason {
    Method(String),
    Body(String),
    TooLarge(usize),
}

impl RejectReason {
    fn into_response(self) -> AppResponse {
        match self {
            RejectReason::Method(msg) => {
                detail_response(StatusCode::METHOD_NOT_ALLOWED, msg)
            }
            RejectReason::Body(msg) => detail_response(StatusCode::BAD_REQUEST, msg),
            RejectReason::TooLarge(limit) => detail_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Request body exceeds {} bytes", limit),
            ),
        }
    }
}

/// Run one hyper request through the application.
///
/// Transport-level problems (unsupported method, unreadable or oversized
/// body) are answered directly. Handler failures come back as `Err`.
pub async fn dispatch<B>(
    app: &Router,
    req: Request<B>,
    max_body_size: usize,
    request_id: &str,
) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let request = match convert_request(req, max_body_size).await {
        Ok(request) => request,
        Err(reason) => {
            warn!("Rejected request: {:?} [{}]", reason, request_id);
            return Ok(build_response(reason.into_response()));
        }
    };

    debug!("{} {} [{}]", request.method, request.path, request_id);
    let response = app.dispatch(request, request_id).await?;
    Ok(build_response(response))
}

/// Convert a hyper Request to an AppRequest.
async fn convert_request<B>(
    req: Request<B>,
    max_body_size: usize,
) -> Result<AppRequest, RejectReason>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = Method::try_from(req.method()).map_err(RejectReason::Method)?;
    let path = req.uri().path().to_string();

    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    // Stops polling as soon as the running total passes the limit.
    let body_bytes = match Limited::new(req.into_body(), max_body_size).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return Err(RejectReason::TooLarge(max_body_size))
        }
        Err(e) => return Err(RejectReason::Body(e.to_string())),
    };
    let body = if body_bytes.is_empty() {
        None
    } else {
        Some(body_bytes)
    };

    Ok(AppRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Build a hyper Response from an AppResponse.
pub fn build_response(app_response: AppResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(app_response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            app_response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut response = Response::new(Full::new(app_response.body.unwrap_or_default()));
    *response.status_mut() = status;

    for (name, value) in app_response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!("Dropping invalid response header '{}'", name),
        }
    }

    response
}

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique request ID.
pub fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{}", timestamp, seq)
}
