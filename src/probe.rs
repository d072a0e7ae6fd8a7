//! The `/chat` smoke probe.
//!
//! Sends one fixed message to the chat endpoint through an in-process
//! [`TestClient`] and writes a three-part report:
//!
//! ```text
//! status <code>
//! json: <decoded body>          (or: could not parse json: <error>)
//!
//! --- Response text ---
//! <raw body>
//! ```
//!
//! A body that is not JSON is part of the report, not a failure. Anything
//! else (the request failing, the application raising, the writer failing)
//! is returned as a [`ProbeError`].

use crate::app::CHAT_PATH;
use crate::client::{ClientError, TestClient, TestResponse};
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// Message sent by the probe.
pub const PROBE_MESSAGE: &str = "hello from debug";

/// Header line introducing the raw body section.
pub const RAW_TEXT_HEADER: &str = "--- Response text ---";

/// Body of the probe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbePayload {
    pub message: &'static str,
}

impl Default for ProbePayload {
    fn default() -> Self {
        Self {
            message: PROBE_MESSAGE,
        }
    }
}

/// Error that aborts a probe run.
#[derive(Debug)]
pub enum ProbeError {
    /// The request could not be completed.
    Client(ClientError),
    /// The report could not be written.
    Io(std::io::Error),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Client(e) => write!(f, "probe request failed: {}", e),
            ProbeError::Io(e) => write!(f, "failed to write probe report: {}", e),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Client(e) => Some(e),
            ProbeError::Io(e) => Some(e),
        }
    }
}

impl From<ClientError> for ProbeError {
    fn from(err: ClientError) -> Self {
        ProbeError::Client(err)
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        ProbeError::Io(err)
    }
}

/// Send the probe request and write the report to `out`.
///
/// Nothing is written if the request itself fails.
pub async fn run<W: Write>(client: &TestClient, out: &mut W) -> Result<(), ProbeError> {
    let response = client.post_json(CHAT_PATH, &ProbePayload::default()).await?;
    debug!(
        "Probe response: status {} (success: {}), {} body bytes",
        response.status_code(),
        response.status().is_success(),
        response.bytes().len()
    );
    report(&response, out)?;
    Ok(())
}

/// Write the three-part report for a response.
///
/// Decoded JSON is printed in serde_json's compact form, e.g. `{"reply":"hi"}`.
pub fn report<W: Write>(response: &TestResponse, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "status {}", response.status_code())?;

    match response.json::<serde_json::Value>() {
        Ok(value) => writeln!(out, "json: {}", value)?,
        Err(e) => writeln!(out, "could not parse json: {}", e)?,
    }

    writeln!(out)?;
    writeln!(out, "{}", RAW_TEXT_HEADER)?;
    writeln!(out, "{}", response.text())?;
    out.flush()
}
