// SPDX-License-Identifier: MIT

use super::fake::FakeHttpClient;
use super::*;
use std::time::Duration;

fn get(url: &str) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url: url.into(),
        headers: BTreeMap::new(),
        body: None,
        timeout: Duration::from_secs(1),
    }
}

#[tokio::test]
async fn fake_client_returns_stubbed_response() {
    let client = FakeHttpClient::new();
    client.stub(
        "http://child/process",
        HttpResponse { status: 200, body: serde_json::json!({"status": "completed"}) },
    );

    let response = client.send(get("http://child/process")).await.expect("stubbed response");
    assert_eq!(response.status, 200);
    assert_eq!(response.body["status"], "completed");
    assert_eq!(client.sent_count(), 1);
}

#[tokio::test]
async fn fake_client_errors_on_unregistered_url() {
    let client = FakeHttpClient::new();
    let err = client.send(get("http://nowhere")).await.unwrap_err();
    assert!(matches!(err, HttpError::Transport(_)));
}

#[tokio::test]
async fn fake_client_surfaces_non_2xx_as_status_error() {
    let client = FakeHttpClient::new();
    client.stub(
        "http://child/process",
        HttpResponse { status: 503, body: serde_json::json!({"error": "down"}) },
    );
    let err = client.send(get("http://child/process")).await.unwrap_err();
    match err {
        HttpError::Status { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn fake_client_honors_stub_error() {
    let client = FakeHttpClient::new();
    client.stub_error("http://child/process", "connection reset");
    let err = client.send(get("http://child/process")).await.unwrap_err();
    assert!(matches!(err, HttpError::Transport(_)));
}

#[test]
fn http_response_is_success_checks_2xx_range() {
    assert!(HttpResponse { status: 204, body: Value::Null }.is_success());
    assert!(!HttpResponse { status: 404, body: Value::Null }.is_success());
}
