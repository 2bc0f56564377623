// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service Supervisor (spec.md §4.4): spawns and tears down Child Service
//! Runtime processes, serializing every operation on one service name behind
//! a per-`serviceName` mutex so `EnsureService` calls for the same service
//! never race.
//!
//! Service inventory is kept in memory only — unlike the port and flag
//! tables, spec.md §6 does not list a persisted service-inventory file, and a
//! restarted supervisor is expected to re-discover live state by health
//! checking, not by trusting a stale snapshot.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bos_adapters::{ChildSpawnSpec, HttpClient, HttpMethod, HttpRequest, ProcessAdapter};
use bos_core::{Clock, CompanyContext, JourneySpec, ServiceName, ServiceRecord, ServiceState, StepSpec, SystemClock};
use parking_lot::{Mutex as SyncMutex, RwLock};
use tokio::sync::Mutex as AsyncMutex;

use crate::error::EngineError;
use crate::ports::PortAllocator;

/// Health-wait backoff schedule (spec.md §4.4: "5 attempts, 100ms -> 1600ms").
const HEALTH_WAIT_ATTEMPTS: u32 = 5;
const HEALTH_WAIT_INITIAL: Duration = Duration::from_millis(100);

pub struct SupervisorConfig {
    pub binary_path: PathBuf,
    pub engine_base_url: String,
    /// Service names the teardown operations must never stop (spec.md §4.4
    /// "preserved-infrastructure-set teardown exemption").
    pub preserved: HashSet<ServiceName>,
}

pub struct ServiceSupervisor<P: ProcessAdapter, H: HttpClient, C: Clock = SystemClock> {
    adapter: Arc<P>,
    http: Arc<H>,
    ports: Arc<PortAllocator<bos_storage::FsCheckpointWriter, C>>,
    clock: C,
    config: SupervisorConfig,
    inventory: RwLock<HashMap<ServiceName, ServiceRecord>>,
    locks: SyncMutex<HashMap<ServiceName, Arc<AsyncMutex<()>>>>,
}

impl<P: ProcessAdapter, H: HttpClient, C: Clock> ServiceSupervisor<P, H, C> {
    pub fn new(adapter: Arc<P>, http: Arc<H>, ports: Arc<PortAllocator<bos_storage::FsCheckpointWriter, C>>, clock: C, config: SupervisorConfig) -> Self {
        Self { adapter, http, ports, clock, config, inventory: RwLock::new(HashMap::new()), locks: SyncMutex::new(HashMap::new()) }
    }

    fn lock_for(&self, service_name: &ServiceName) -> Arc<AsyncMutex<()>> {
        self.locks.lock().entry(service_name.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }

    pub fn inventory(&self) -> Vec<ServiceRecord> {
        self.inventory.read().values().cloned().collect()
    }

    /// Ensure one service (one journey step) is running and healthy,
    /// spawning it if absent (spec.md §4.4 "EnsureService").
    pub async fn ensure_service(&self, step: &StepSpec, company: &CompanyContext, journey_type: &str) -> Result<ServiceRecord, EngineError> {
        let service_name = ServiceName::from(step.service_name.as_str());
        let lock = self.lock_for(&service_name);
        let _guard = lock.lock().await;

        if let Some(record) = self.inventory.read().get(&service_name).cloned() {
            if record.state == ServiceState::Healthy {
                return Ok(record);
            }
        }

        let allocation = self.ports.allocate(service_name.as_str())?;
        let spawn_spec = ChildSpawnSpec {
            binary_path: self.config.binary_path.clone(),
            service_name: service_name.as_str().to_string(),
            port: allocation.port,
            company_name: company.company_name.clone(),
            domain: company.domain.clone(),
            industry_type: company.industry_type.clone(),
            journey_type: journey_type.to_string(),
            engine_base_url: self.config.engine_base_url.clone(),
            observability_env: Vec::new(),
        };

        let spawned = self.adapter.spawn(&spawn_spec).await.map_err(|e| EngineError::StepTransportError { service_name: service_name.to_string(), message: e.to_string() })?;

        let mut record = ServiceRecord {
            service_name: service_name.clone(),
            pid: spawned.pid,
            port: allocation.port,
            start_time_ms: self.clock.epoch_ms(),
            last_healthy_at_ms: None,
            company_context: company.clone(),
            journey_type: journey_type.to_string(),
            state: ServiceState::Starting,
        };
        self.inventory.write().insert(service_name.clone(), record.clone());
        // Reap in the background instead of dropping the handle inline: the
        // handle no longer kills on drop (see `OsProcessAdapter::spawn`), so
        // this just prevents a zombie once the process eventually exits via
        // `terminate`/`kill`.
        let mut handle = spawned.into_handle();
        tokio::spawn(async move {
            let _ = handle.wait().await;
        });

        self.wait_healthy(&service_name, allocation.port).await?;

        record.state = ServiceState::Healthy;
        record.last_healthy_at_ms = Some(self.clock.epoch_ms());
        self.inventory.write().insert(service_name.clone(), record.clone());
        Ok(record)
    }

    async fn wait_healthy(&self, service_name: &ServiceName, port: u16) -> Result<(), EngineError> {
        let mut backoff = HEALTH_WAIT_INITIAL;
        for attempt in 1..=HEALTH_WAIT_ATTEMPTS {
            let request = HttpRequest {
                method: HttpMethod::Get,
                url: format!("http://127.0.0.1:{port}/health"),
                headers: Default::default(),
                body: None,
                timeout: Duration::from_secs(2),
            };
            if self.http.send(request).await.is_ok() {
                return Ok(());
            }
            if attempt == HEALTH_WAIT_ATTEMPTS {
                break;
            }
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }
        Err(EngineError::ChildHealthTimeout { service_name: service_name.to_string() })
    }

    /// Ensure every step's service in `journey` is running (spec.md §4.4
    /// "EnsureJourney").
    pub async fn ensure_journey(&self, journey: &JourneySpec) -> Result<Vec<ServiceRecord>, EngineError> {
        let company = CompanyContext { company_name: journey.company_name.clone(), domain: journey.domain.clone(), industry_type: journey.industry_type.clone() };
        let mut records = Vec::with_capacity(journey.steps.len());
        for step in &journey.steps {
            records.push(self.ensure_service(step, &company, &journey.industry_type).await?);
        }
        Ok(records)
    }

    /// Stop every service belonging to `company_name`, exempting the
    /// preserved infrastructure set (spec.md §4.4, §4.5 "cleanup-before-start
    /// invariant").
    pub async fn stop_customer_journey_services(&self, company_name: &str) {
        let targets: Vec<ServiceName> = self
            .inventory
            .read()
            .values()
            .filter(|r| r.company_context.company_name == company_name)
            .map(|r| r.service_name.clone())
            .collect();
        self.stop_services(&targets).await;
    }

    /// Stop every tracked service (spec.md §4.4 "StopAll"), then perform a
    /// best-effort sweep for stray child processes the inventory lost track
    /// of, belt-and-braces against crashed supervisor restarts.
    pub async fn stop_all(&self) {
        let targets: Vec<ServiceName> = self.inventory.read().keys().cloned().collect();
        self.stop_services(&targets).await;
        self.sweep_stray_processes();
    }

    async fn stop_services(&self, targets: &[ServiceName]) {
        for service_name in targets {
            if self.config.preserved.contains(service_name) {
                continue;
            }
            let lock = self.lock_for(service_name);
            let _guard = lock.lock().await;

            let Some(mut record) = self.inventory.read().get(service_name).cloned() else { continue };
            if record.state.can_transition_to(ServiceState::Stopping) {
                record.state = ServiceState::Stopping;
                self.inventory.write().insert(service_name.clone(), record.clone());
            }
            let _ = self.adapter.terminate(record.pid);
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = self.adapter.kill(record.pid);
            let _ = self.ports.release(record.port);
            self.inventory.write().remove(service_name);
        }
    }

    /// Scan `/proc` for live processes the inventory lost track of whose argv
    /// either names the configured child binary directly, or titles
    /// themselves `<stepName>Service-<companyName>` the way
    /// `OsProcessAdapter::spawn` sets argv[0] (spec.md §4.3 "launch args that
    /// set the process title to serviceName"; §4.4/§9 "StopAll... kill any
    /// residual process whose argv matches the `*Service` naming
    /// convention"). Best-effort: unreachable process information
    /// (non-Linux, permission denied) is silently skipped rather than
    /// treated as an error.
    fn sweep_stray_processes(&self) {
        #[cfg(target_os = "linux")]
        {
            let known_pids: HashSet<u32> = self.inventory.read().values().map(|r| r.pid).collect();
            let binary_name = self.config.binary_path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
            let Ok(entries) = std::fs::read_dir("/proc") else { return };
            for entry in entries.flatten() {
                let Ok(pid) = entry.file_name().to_string_lossy().parse::<u32>() else { continue };
                if known_pids.contains(&pid) {
                    continue;
                }
                let cmdline_path = entry.path().join("cmdline");
                let Ok(cmdline) = std::fs::read(&cmdline_path) else { continue };
                let cmdline = String::from_utf8_lossy(&cmdline);
                let matches_binary = !binary_name.is_empty() && cmdline.contains(&binary_name);
                if matches_binary || Self::matches_service_naming_convention(&cmdline) {
                    let _ = self.adapter.kill(pid);
                }
            }
        }
    }

    /// True if any NUL-separated argv entry in a raw `/proc/<pid>/cmdline`
    /// read looks like a `<stepName>Service-<companyName>` title — the
    /// convention `ServiceName`'s own `Display` follows (see
    /// `bos-core::service`), and the one `OsProcessAdapter::spawn` sets as
    /// argv[0].
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    fn matches_service_naming_convention(cmdline: &str) -> bool {
        cmdline.split('\0').any(|arg| !arg.is_empty() && arg.contains("Service-"))
    }

    /// Health-check every tracked service, updating its state per the
    /// `Healthy <-> Unhealthy` transition (spec.md §4.4
    /// "PerformHealthCheck").
    pub async fn perform_health_check(&self) {
        let targets: Vec<(ServiceName, u16, ServiceState)> = self.inventory.read().values().map(|r| (r.service_name.clone(), r.port, r.state)).collect();
        for (service_name, port, state) in targets {
            if state != ServiceState::Healthy && state != ServiceState::Unhealthy {
                continue;
            }
            let request = HttpRequest {
                method: HttpMethod::Get,
                url: format!("http://127.0.0.1:{port}/health"),
                headers: Default::default(),
                body: None,
                timeout: Duration::from_secs(2),
            };
            let healthy = self.http.send(request).await.is_ok();
            let next_state = if healthy { ServiceState::Healthy } else { ServiceState::Unhealthy };
            if next_state == state {
                if healthy {
                    if let Some(record) = self.inventory.write().get_mut(&service_name) {
                        record.last_healthy_at_ms = Some(self.clock.epoch_ms());
                    }
                }
                continue;
            }
            if !state.can_transition_to(next_state) {
                continue;
            }
            if let Some(record) = self.inventory.write().get_mut(&service_name) {
                record.state = next_state;
                if healthy {
                    record.last_healthy_at_ms = Some(self.clock.epoch_ms());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
