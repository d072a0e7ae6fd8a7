//! Tests for the `/chat` probe report.

use chat_probe::prelude::*;
use chat_probe::probe::{self, PROBE_MESSAGE};
use std::sync::{Arc, Mutex};

/// Answers every request with a canned status and body.
struct CannedHandler {
    status: u16,
    body: Option<&'static str>,
}

#[async_trait]
impl Handler for CannedHandler {
    async fn handle(
        &self,
        _request: AppRequest,
        _ctx: &RequestContext,
    ) -> Result<AppResponse, AppError> {
        let response = AppResponse::new(self.status);
        Ok(match self.body {
            Some(body) => response.body(body),
            None => response,
        })
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// Records the raw request body it receives.
struct RecordingHandler {
    seen: Arc<Mutex<Vec<AppRequest>>>,
}

#[async_trait]
impl Handler for RecordingHandler {
    async fn handle(
        &self,
        request: AppRequest,
        _ctx: &RequestContext,
    ) -> Result<AppResponse, AppError> {
        self.seen.lock().unwrap().push(request);
        Ok(AppResponse::json(&serde_json::json!({ "reply": "ok" }))?)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct FailingHandler;

#[async_trait]
impl Handler for FailingHandler {
    async fn handle(
        &self,
        _request: AppRequest,
        _ctx: &RequestContext,
    ) -> Result<AppResponse, AppError> {
        Err(AppError::new("model backend unavailable"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn client_for(handler: Arc<dyn Handler>) -> TestClient {
    let mut router = Router::new();
    router.route(Method::Post, "/chat", handler).unwrap();
    TestClient::new(Arc::new(router))
}

async fn probe_output(client: &TestClient) -> String {
    let mut out = Vec::new();
    probe::run(client, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_json_reply_is_reported() {
    let client = client_for(Arc::new(CannedHandler {
        status: 200,
        body: Some(r#"{"reply":"hi"}"#),
    }));

    let output = probe_output(&client).await;

    assert_eq!(
        output,
        "status 200\njson: {\"reply\":\"hi\"}\n\n--- Response text ---\n{\"reply\":\"hi\"}\n"
    );
}

#[tokio::test]
async fn test_plain_text_body_reports_decode_failure() {
    let client = client_for(Arc::new(CannedHandler {
        status: 200,
        body: Some("plain text"),
    }));

    let output = probe_output(&client).await;
    let lines: Vec<&str> = output.split('\n').collect();

    assert_eq!(lines[0], "status 200");
    let description = lines[1]
        .strip_prefix("could not parse json: ")
        .expect("decode failure line");
    assert!(!description.is_empty());
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "--- Response text ---");
    assert_eq!(lines[4], "plain text");
    assert_eq!(lines.len(), 6);
}

#[tokio::test]
async fn test_error_status_still_decodes_json() {
    let client = client_for(Arc::new(CannedHandler {
        status: 500,
        body: Some(r#"{"error":"boom"}"#),
    }));

    let output = probe_output(&client).await;

    assert!(output.starts_with("status 500\njson: {\"error\":\"boom\"}\n"));
    assert!(output.ends_with("--- Response text ---\n{\"error\":\"boom\"}\n"));
}

#[tokio::test]
async fn test_empty_body_reports_decode_failure() {
    let client = client_for(Arc::new(CannedHandler {
        status: 204,
        body: None,
    }));

    let output = probe_output(&client).await;

    assert!(output.starts_with("status 204\ncould not parse json: "));
    assert!(output.ends_with("\n\n--- Response text ---\n\n"));
}

#[tokio::test]
async fn test_request_payload_is_fixed() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let client = client_for(Arc::new(RecordingHandler { seen: seen.clone() }));

    probe_output(&client).await;

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.path, "/chat");
    assert_eq!(
        request.get_header("content-type"),
        Some(&"application/json".to_string())
    );
    assert_eq!(
        request.text(),
        Some(r#"{"message":"hello from debug"}"#.to_string())
    );
    let value: serde_json::Value = request.json().unwrap().unwrap();
    assert_eq!(value, serde_json::json!({ "message": PROBE_MESSAGE }));
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let client = TestClient::new(Arc::new(chat_app().unwrap()));

    let first = probe_output(&client).await;
    let second = probe_output(&client).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_default_app_reply() {
    let client = TestClient::new(Arc::new(chat_app().unwrap()));

    let output = probe_output(&client).await;

    assert_eq!(
        output,
        "status 200\n\
         json: {\"reply\":\"You said: hello from debug\"}\n\
         \n\
         --- Response text ---\n\
         {\"reply\":\"You said: hello from debug\"}\n"
    );
}

#[tokio::test]
async fn test_application_error_aborts_without_output() {
    let client = client_for(Arc::new(FailingHandler));
    let mut out = Vec::new();

    let result = probe::run(&client, &mut out).await;

    match result {
        Err(ProbeError::Client(ClientError::Application(err))) => {
            assert_eq!(err.code, 500);
            assert_eq!(err.message, "model backend unavailable");
        }
        other => panic!("expected application error, got {:?}", other),
    }
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_missing_route_is_reported_not_raised() {
    let client = TestClient::new(Arc::new(Router::new()));

    let output = probe_output(&client).await;

    assert!(output.starts_with("status 404\njson: {\"detail\":\"Not Found\"}\n"));
}
