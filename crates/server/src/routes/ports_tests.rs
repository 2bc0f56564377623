// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bos_adapters::http::fake::FakeHttpClient;
use tower::ServiceExt;

use crate::test_support::test_state;

#[tokio::test]
async fn list_ports_reports_the_configured_range_with_no_allocations_yet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path(), FakeHttpClient::new());
    let app = crate::build_router(state);

    let response = app.oneshot(Request::builder().uri("/api/ports").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: bos_wire::PortsResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(body.allocations.is_empty());
    assert_eq!(body.range_min, 23000);
    assert_eq!(body.range_max, 23010);
}

#[tokio::test]
async fn cleanup_ports_reports_zero_released_when_nothing_is_stale() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path(), FakeHttpClient::new());
    let app = crate::build_router(state);

    let response = app.oneshot(Request::builder().method("POST").uri("/api/ports/cleanup").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: bos_wire::PortsCleanupResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.released, 0);
}
