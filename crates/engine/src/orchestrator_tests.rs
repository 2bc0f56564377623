// SPDX-License-Identifier: MIT

use super::*;
use bos_adapters::http::fake::FakeHttpClient;
use bos_adapters::spawn::fake::FakeProcessAdapter;
use bos_adapters::HttpResponse;
use bos_core::test_support::sample_journey;
use bos_core::FakeClock;
use serde_json::json;

use crate::fanout::fake::RecordingSink;
use crate::supervisor::SupervisorConfig;

fn harness(
    dir: &std::path::Path,
    range_max: u16,
) -> (
    JourneyOrchestrator<FakeProcessAdapter, FakeHttpClient, FakeClock>,
    FakeHttpClient,
    Arc<RecordingSink>,
) {
    let clock = FakeClock::new();
    let adapter = FakeProcessAdapter::new();
    let http = FakeHttpClient::new();
    let ports = Arc::new(crate::ports::PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.join("ports.json"), 23000, range_max, clock.clone()).expect("open ports"));
    let config = SupervisorConfig { binary_path: std::path::PathBuf::from("/usr/bin/bos-child"), engine_base_url: "http://127.0.0.1:9000".into(), preserved: Default::default() };
    let supervisor = Arc::new(ServiceSupervisor::new(Arc::new(adapter), Arc::new(http.clone()), ports, clock.clone(), config));
    let sink = Arc::new(RecordingSink::new());
    let concurrency = Arc::new(tokio::sync::Semaphore::new(50));
    let orchestrator = JourneyOrchestrator::new(supervisor, Arc::new(http.clone()), sink.clone(), clock, concurrency);
    (orchestrator, http, sink)
}

fn stub_all_healthy(http: &FakeHttpClient, min: u16, max: u16) {
    for port in min..=max {
        http.stub(format!("http://127.0.0.1:{port}/health"), HttpResponse { status: 200, body: json!({"status": "ok"}) });
    }
}

fn stub_all_process_success(http: &FakeHttpClient, min: u16, max: u16) {
    for port in min..=max {
        http.stub(
            format!("http://127.0.0.1:{port}/process"),
            HttpResponse {
                status: 200,
                body: json!({
                    "status": "success",
                    "httpStatus": 200,
                    "processingTimeMs": 42,
                    "correlationId": "cor-0000000000000000000",
                    "stepName": "step",
                    "serviceName": "svc",
                    "errorType": null,
                    "errorMessage": null,
                    "featureFlag": null,
                }),
            },
        );
    }
}

#[tokio::test]
async fn simulate_journey_runs_every_step_and_reports_completed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (orchestrator, http, sink) = harness(dir.path(), 23002);
    stub_all_healthy(&http, 23000, 23002);
    stub_all_process_success(&http, 23000, 23002);

    let journey = sample_journey("Acme");
    let result = orchestrator.simulate_journey(&journey, &SimulationOptions::default(), &BTreeMap::new()).await.expect("simulate");

    assert_eq!(result.status, bos_core::JourneyStatus::Completed);
    assert_eq!(result.steps.len(), 3);
    assert!(result.steps.iter().all(|s| s.status == StepResultStatus::Completed));
    assert_eq!(sink.business.lock().len(), 3);
}

#[tokio::test]
async fn chained_mode_only_invokes_the_first_step() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (orchestrator, http, sink) = harness(dir.path(), 23002);
    stub_all_healthy(&http, 23000, 23002);
    stub_all_process_success(&http, 23000, 23002);

    let journey = sample_journey("Acme");
    let options = SimulationOptions { chained: true, ..Default::default() };
    let result = orchestrator.simulate_journey(&journey, &options, &BTreeMap::new()).await.expect("simulate");

    assert_eq!(result.steps[0].status, StepResultStatus::Completed);
    assert_eq!(result.steps[1].status, StepResultStatus::Skipped);
    assert_eq!(result.steps[2].status, StepResultStatus::Skipped);
    assert_eq!(sink.business.lock().len(), 1);
}

#[tokio::test]
async fn a_failed_step_marks_the_journey_partial_in_non_chained_mode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (orchestrator, http, _sink) = harness(dir.path(), 23002);
    stub_all_healthy(&http, 23000, 23002);
    stub_all_process_success(&http, 23000, 23002);
    // Second allocated port (Checkout) returns a failure body.
    http.stub(
        "http://127.0.0.1:23001/process".to_string(),
        HttpResponse {
            status: 200,
            body: json!({
                "status": "failed",
                "httpStatus": 503,
                "processingTimeMs": 5,
                "correlationId": "cor-0000000000000000000",
                "stepName": "Checkout",
                "serviceName": "CheckoutService-acme",
                "errorType": "service_unavailable",
                "errorMessage": "downstream unavailable",
                "featureFlag": "errors_per_transaction",
            }),
        },
    );

    let journey = sample_journey("Acme");
    let result = orchestrator.simulate_journey(&journey, &SimulationOptions::default(), &BTreeMap::new()).await.expect("simulate");

    assert_eq!(result.status, bos_core::JourneyStatus::Partial);
    assert_eq!(result.steps[1].status, StepResultStatus::Failed);
    assert_eq!(result.steps[1].error_type.as_deref(), Some("service_unavailable"));
}

#[tokio::test]
async fn simulate_multiple_customers_runs_the_journey_the_requested_number_of_times() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (orchestrator, http, _sink) = harness(dir.path(), 23009);
    stub_all_healthy(&http, 23000, 23009);
    stub_all_process_success(&http, 23000, 23009);

    let journey = sample_journey("Acme");
    let results = orchestrator.simulate_multiple_customers(&journey, 2, &SimulationOptions::default(), &BTreeMap::new()).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_ok()));
}
