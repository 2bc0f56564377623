// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bos_adapters::http::fake::FakeHttpClient;
use bos_adapters::HttpResponse;
use bos_core::test_support::sample_journey;
use bos_core::JourneyStatus;
use serde_json::json;
use tower::ServiceExt;

use crate::test_support::test_state;

fn stub_healthy_and_process(http: &FakeHttpClient, port_range: std::ops::RangeInclusive<u16>) {
    for port in port_range {
        http.stub(format!("http://127.0.0.1:{port}/health"), HttpResponse { status: 200, body: json!({"status": "ok"}) });
        http.stub(
            format!("http://127.0.0.1:{port}/process"),
            HttpResponse {
                status: 200,
                body: json!({
                    "status": "completed",
                    "httpStatus": 200,
                    "processingTimeMs": 10,
                    "correlationId": "cor-fakeresponseid01",
                    "stepName": "step",
                    "serviceName": "any",
                    "additionalFields": {},
                    "errorType": null,
                    "errorMessage": null,
                    "featureFlag": null,
                }),
            },
        );
    }
}

#[tokio::test]
async fn simulate_journey_runs_every_step_and_returns_completed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let http = FakeHttpClient::new();
    stub_healthy_and_process(&http, 23000..=23010);
    let state = test_state(dir.path(), http);

    let journey = sample_journey("Acme");
    let body = json!({"journey": journey});
    let app = crate::build_router(state);

    let response = app
        .oneshot(Request::builder().method("POST").uri("/api/journey/simulate").header("content-type", "application/json").body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let result: bos_core::JourneyRunResult = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(result.status, JourneyStatus::Completed);
    assert_eq!(result.steps.len(), 3);
}

#[tokio::test]
async fn simulate_multiple_reports_per_customer_outcomes_without_failing_the_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    let http = FakeHttpClient::new();
    stub_healthy_and_process(&http, 23000..=23010);
    let state = test_state(dir.path(), http);

    let journey = sample_journey("Acme");
    let body = json!({"journey": journey, "customerCount": 3});
    let app = crate::build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/journey/simulate-multiple")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: bos_wire::SimulateMultipleResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed.results.len(), 3);
}
