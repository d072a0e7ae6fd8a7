//! Request type seen by application handlers.

use bytes::Bytes;
use std::collections::HashMap;

/// HTTP method enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
        }
    }
}

impl TryFrom<&hyper::Method> for Method {
    type Error = String;

    fn try_from(method: &hyper::Method) -> Result<Self, Self::Error> {
        match *method {
            hyper::Method::GET => Ok(Method::Get),
            hyper::Method::POST => Ok(Method::Post),
            hyper::Method::PUT => Ok(Method::Put),
            hyper::Method::DELETE => Ok(Method::Delete),
            hyper::Method::PATCH => Ok(Method::Patch),
            hyper::Method::HEAD => Ok(Method::Head),
            hyper::Method::OPTIONS => Ok(Method::Options),
            ref other => Err(format!("unsupported method {}", other)),
        }
    }
}

impl From<Method> for hyper::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => hyper::Method::GET,
            Method::Post => hyper::Method::POST,
            Method::Put => hyper::Method::PUT,
            Method::Delete => hyper::Method::DELETE,
            Method::Patch => hyper::Method::PATCH,
            Method::Head => hyper::Method::HEAD,
            Method::Options => hyper::Method::OPTIONS,
        }
    }
}

/// An HTTP request after it has left the transport layer.
#[derive(Debug, Clone)]
pub struct AppRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path, without query string.
    pub path: String,
    /// HTTP headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,
    /// Request body. `None` when the body was empty.
    pub body: Option<Bytes>,
}

impl AppRequest {
    /// Create a new request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request. Names are stored lowercase.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get a header value, case-insensitively.
    pub fn get_header(&self, key: &str) -> Option<&String> {
        self.headers.get(&key.to_ascii_lowercase())
    }

    /// Get the body as text if present.
    pub fn text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).to_string())
    }

    /// Parse the body as JSON if present.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.body.as_ref().map(|b| serde_json::from_slice(b))
    }
}

impl Default for AppRequest {
    fn default() -> Self {
        Self::new(Method::Get, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive() {
        let request =
            AppRequest::new(Method::Post, "/chat").header("Content-Type", "application/json");
        assert_eq!(
            request.get_header("content-type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(
            request.get_header("CONTENT-TYPE"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn unsupported_hyper_method_is_rejected() {
        assert!(Method::try_from(&hyper::Method::TRACE).is_err());
        assert_eq!(Method::try_from(&hyper::Method::POST), Ok(Method::Post));
    }
}
