// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixture for route-handler tests: an [`AppState`] wired entirely
//! from `bos-adapters`' fakes and a temp directory, the same seam-swapping
//! approach `bos-engine`'s own unit tests use.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use bos_adapters::http::fake::FakeHttpClient;
use bos_adapters::spawn::fake::FakeProcessAdapter;
use bos_core::{Clock, FakeClock, ServiceName};
use bos_engine::autoload::AutoLoadConfig;
use bos_engine::{AutoLoadGenerator, EventFanout, EventSink, FlagStore, JourneyOrchestrator, PortAllocator, ServiceSupervisor, SupervisorConfig};
use bos_runbook::ConfigStore;
use tokio::sync::Semaphore;

use crate::state::AppState;

pub type TestAppState = AppState<FakeProcessAdapter, FakeHttpClient, FakeClock>;

/// An [`AppState`] backed by a fresh temp directory and a real
/// [`EventFanout`] (queueing against `http`, the same fake every other
/// component shares, so `GET /api/health/detailed` sees consistent depth
/// and delivery counters).
pub fn test_state(dir: &std::path::Path, http: FakeHttpClient) -> Arc<TestAppState> {
    let clock = FakeClock::new();
    let http = Arc::new(http);

    let fanout = Arc::new(EventFanout::spawn(http.clone(), "http://127.0.0.1:1/unused".to_string(), Some(16)));
    let sink: Arc<dyn EventSink> = fanout.clone();

    let ports = Arc::new(PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.join("ports.json"), 23000, 23010, clock.clone()).expect("open ports"));
    let flags = Arc::new(FlagStore::open_with(bos_storage::FsCheckpointWriter, dir.join("flags.json"), clock.epoch_ms(), sink.clone(), clock.clone()).expect("open flags"));
    let configs = Arc::new(ConfigStore::open(dir.join("configs")));

    let supervisor_config = SupervisorConfig { binary_path: PathBuf::from("/usr/bin/bos-child"), engine_base_url: "http://127.0.0.1:9000".into(), preserved: HashSet::new() };
    let supervisor = Arc::new(ServiceSupervisor::new(Arc::new(FakeProcessAdapter::new()), http.clone(), ports.clone(), clock.clone(), supervisor_config));

    let concurrency = Arc::new(Semaphore::new(50));
    let orchestrator = Arc::new(JourneyOrchestrator::new(supervisor.clone(), http, sink, clock.clone(), concurrency.clone()));

    let autoload = AutoLoadGenerator::new(supervisor.clone(), orchestrator.clone(), configs.clone(), clock, concurrency, AutoLoadConfig { enabled: false, ..Default::default() });

    Arc::new(AppState {
        ports,
        flags,
        supervisor,
        orchestrator,
        fanout,
        autoload,
        configs,
        started_at: Instant::now(),
        port_range: (23000, 23010),
        preserved_services: Vec::new(),
        child_binary_path: PathBuf::from("/usr/bin/bos-child"),
        engine_base_url: "http://127.0.0.1:9000".into(),
    })
}

pub fn derived_service_name(step_name: &str, company_name: &str) -> ServiceName {
    ServiceName::from(format!("{step_name}Service-{company_name}"))
}
