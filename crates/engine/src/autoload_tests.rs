// SPDX-License-Identifier: MIT

use super::*;
use bos_adapters::http::fake::FakeHttpClient;
use bos_adapters::spawn::fake::FakeProcessAdapter;
use bos_adapters::HttpResponse;
use bos_core::test_support::sample_journey;
use bos_core::FakeClock;
use bos_runbook::{ConfigStore, SavedJourneyConfig};
use serde_json::json;

use crate::fanout::fake::RecordingSink;
use crate::supervisor::SupervisorConfig;

type Generator = AutoLoadGenerator<FakeProcessAdapter, FakeHttpClient, FakeClock>;

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
                    "processingTimeMs": 10,
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

async fn harness(dir: &std::path::Path, config: AutoLoadConfig) -> (Arc<Generator>, FakeHttpClient) {
    let clock = FakeClock::new();
    let adapter = FakeProcessAdapter::new();
    let http = FakeHttpClient::new();
    let ports = Arc::new(crate::ports::PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.join("ports.json"), 24000, 24010, clock.clone()).expect("open ports"));
    stub_all_healthy(&http, 24000, 24010);
    stub_all_process_success(&http, 24000, 24010);

    let supervisor_config = SupervisorConfig { binary_path: std::path::PathBuf::from("/usr/bin/bos-child"), engine_base_url: "http://127.0.0.1:9000".into(), preserved: Default::default() };
    let supervisor = Arc::new(ServiceSupervisor::new(Arc::new(adapter), Arc::new(http.clone()), ports, clock.clone(), supervisor_config));

    let journey = sample_journey("Acme");
    supervisor.ensure_journey(&journey).await.expect("ensure_journey");

    let templates = Arc::new(ConfigStore::open_with_writer(bos_storage::FsCheckpointWriter, dir.join("configs")));
    templates.save(&SavedJourneyConfig::from_journey_spec("cfg-1", "Acme replay", &journey, clock.epoch_ms())).expect("save config");

    let sink = Arc::new(RecordingSink::new());
    let concurrency = Arc::new(tokio::sync::Semaphore::new(50));
    let orchestrator = Arc::new(JourneyOrchestrator::new(supervisor.clone(), Arc::new(http.clone()), sink, clock.clone(), concurrency.clone()));

    let generator = AutoLoadGenerator::new(supervisor, orchestrator, templates, clock, concurrency, config);
    (generator, http)
}

fn test_config() -> AutoLoadConfig {
    AutoLoadConfig { enabled: true, batch_size: 3, ..AutoLoadConfig::default() }
}

#[tokio::test]
async fn tick_with_no_active_companies_creates_no_drivers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let adapter = FakeProcessAdapter::new();
    let http = FakeHttpClient::new();
    let ports = Arc::new(crate::ports::PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.path().join("ports.json"), 24100, 24110, clock.clone()).expect("open ports"));
    let supervisor_config = SupervisorConfig { binary_path: std::path::PathBuf::from("/usr/bin/bos-child"), engine_base_url: "http://127.0.0.1:9000".into(), preserved: Default::default() };
    let supervisor = Arc::new(ServiceSupervisor::new(Arc::new(adapter), Arc::new(http.clone()), ports, clock.clone(), supervisor_config));
    let templates = Arc::new(ConfigStore::open_with_writer(bos_storage::FsCheckpointWriter, dir.path().join("configs")));
    let sink = Arc::new(RecordingSink::new());
    let concurrency = Arc::new(tokio::sync::Semaphore::new(50));
    let orchestrator = Arc::new(JourneyOrchestrator::new(supervisor.clone(), Arc::new(http), sink, clock.clone(), concurrency.clone()));
    let generator = AutoLoadGenerator::new(supervisor, orchestrator, templates, clock, concurrency, test_config());

    generator.tick().await;

    assert!(generator.snapshot().is_empty());
}

#[tokio::test]
async fn tick_dispatches_a_batch_for_an_active_company_with_a_saved_template() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (generator, _http) = harness(dir.path(), test_config()).await;

    generator.tick().await;

    let snapshot = generator.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].company_name, "Acme");
    assert_eq!(snapshot[0].status, DriverStatus::Active);
    assert_eq!(snapshot[0].stats.iterations, 1);
    assert_eq!(snapshot[0].stats.successes, 3);
    assert_eq!(snapshot[0].stats.errors, 0);
}

#[tokio::test]
async fn a_second_tick_before_the_journey_interval_elapses_does_not_redispatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (generator, _http) = harness(dir.path(), test_config()).await;

    generator.tick().await;
    generator.tick().await;

    let snapshot = generator.snapshot();
    assert_eq!(snapshot[0].stats.iterations, 1);
}

#[tokio::test]
async fn a_company_with_no_saved_template_is_skipped_without_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let adapter = FakeProcessAdapter::new();
    let http = FakeHttpClient::new();
    let ports = Arc::new(crate::ports::PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.path().join("ports.json"), 24200, 24210, clock.clone()).expect("open ports"));
    stub_all_healthy(&http, 24200, 24210);
    let supervisor_config = SupervisorConfig { binary_path: std::path::PathBuf::from("/usr/bin/bos-child"), engine_base_url: "http://127.0.0.1:9000".into(), preserved: Default::default() };
    let supervisor = Arc::new(ServiceSupervisor::new(Arc::new(adapter), Arc::new(http.clone()), ports, clock.clone(), supervisor_config));
    let journey = sample_journey("Untemplated");
    supervisor.ensure_journey(&journey).await.expect("ensure_journey");
    let templates = Arc::new(ConfigStore::open_with_writer(bos_storage::FsCheckpointWriter, dir.path().join("configs")));
    let sink = Arc::new(RecordingSink::new());
    let concurrency = Arc::new(tokio::sync::Semaphore::new(50));
    let orchestrator = Arc::new(JourneyOrchestrator::new(supervisor.clone(), Arc::new(http), sink, clock.clone(), concurrency.clone()));
    let generator = AutoLoadGenerator::new(supervisor, orchestrator, templates, clock, concurrency, test_config());

    generator.tick().await;

    let snapshot = generator.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].stats.iterations, 0, "no template means no batch was ever counted as dispatched");
}

#[tokio::test]
async fn a_driver_degrades_after_three_consecutive_batches_find_no_concurrency_capacity() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let adapter = FakeProcessAdapter::new();
    let http = FakeHttpClient::new();
    let ports = Arc::new(crate::ports::PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.path().join("ports.json"), 24300, 24310, clock.clone()).expect("open ports"));
    stub_all_healthy(&http, 24300, 24310);
    stub_all_process_success(&http, 24300, 24310);
    let supervisor_config = SupervisorConfig { binary_path: std::path::PathBuf::from("/usr/bin/bos-child"), engine_base_url: "http://127.0.0.1:9000".into(), preserved: Default::default() };
    let supervisor = Arc::new(ServiceSupervisor::new(Arc::new(adapter), Arc::new(http.clone()), ports, clock.clone(), supervisor_config));
    let journey = sample_journey("Acme");
    supervisor.ensure_journey(&journey).await.expect("ensure_journey");
    let templates = Arc::new(ConfigStore::open_with_writer(bos_storage::FsCheckpointWriter, dir.path().join("configs")));
    templates.save(&SavedJourneyConfig::from_journey_spec("cfg-1", "Acme replay", &journey, clock.epoch_ms())).expect("save config");
    let sink = Arc::new(RecordingSink::new());
    // Fully saturated: every batch entry finds no permit, so every batch
    // submits zero journeys.
    let concurrency = Arc::new(tokio::sync::Semaphore::new(0));
    let orchestrator = Arc::new(JourneyOrchestrator::new(supervisor.clone(), Arc::new(http), sink, clock.clone(), concurrency.clone()));
    let generator = AutoLoadGenerator::new(supervisor, orchestrator, templates, clock.clone(), concurrency, test_config());

    generator.tick().await;
    clock.advance(std::time::Duration::from_millis(DEFAULT_JOURNEY_INTERVAL_MS));
    generator.tick().await;
    clock.advance(std::time::Duration::from_millis(DEFAULT_JOURNEY_INTERVAL_MS));
    generator.tick().await;

    let snapshot = generator.snapshot();
    assert_eq!(snapshot[0].status, DriverStatus::Degraded);
    assert_eq!(snapshot[0].stats.iterations, 3);
    assert_eq!(snapshot[0].stats.successes, 0);

    // A fourth tick, even once the interval elapses again, never redispatches.
    clock.advance(std::time::Duration::from_millis(DEFAULT_JOURNEY_INTERVAL_MS));
    generator.tick().await;
    assert_eq!(generator.snapshot()[0].stats.iterations, 3, "degraded drivers never auto-restart");
}

#[tokio::test]
async fn spawn_is_a_no_op_when_auto_load_is_disabled() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = AutoLoadConfig { enabled: false, ..test_config() };
    let (generator, _http) = harness(dir.path(), config).await;

    assert!(generator.spawn().is_none());
}
