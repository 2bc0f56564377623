// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Auto-Load Generator (spec.md §4.6): watches the Service Supervisor's
//! inventory for active companies and, for each one, periodically submits a
//! batch of synthetic `SimulateJourney` calls through the Journey
//! Orchestrator at a bounded rate.
//!
//! Opt-in (`ENABLE_CONTINUOUS_JOURNEYS`), off by default — [`AutoLoadGenerator::spawn`]
//! does nothing unless [`AutoLoadConfig::enabled`] is set, mirroring the
//! teacher's cron dispatcher which only arms a timer for crons explicitly
//! started. Concurrency is capped by the same `Arc<Semaphore>` the Journey
//! Orchestrator uses for `SimulateMultipleCustomers`, so a burst call and
//! continuous background traffic can never together exceed one bound.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bos_adapters::HttpClient;
use bos_core::Clock;
use bos_runbook::ConfigStore;
use parking_lot::RwLock;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::orchestrator::{JourneyOrchestrator, SimulationOptions};
use crate::supervisor::ServiceSupervisor;

/// A driver stops retrying a company after this many consecutive batches
/// failed to submit at all (spec.md §4.6 "never auto-restarts a driver that
/// has failed to submit three batches in a row").
const DEGRADE_AFTER_CONSECUTIVE_FAILURES: u32 = 3;

pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_JOURNEY_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_BATCH_SIZE: u32 = 5;

#[derive(Debug, Clone)]
pub struct AutoLoadConfig {
    pub enabled: bool,
    pub watch_interval: Duration,
    pub journey_interval: Duration,
    pub batch_size: u32,
}

impl Default for AutoLoadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            watch_interval: Duration::from_millis(DEFAULT_WATCH_INTERVAL_MS),
            journey_interval: Duration::from_millis(DEFAULT_JOURNEY_INTERVAL_MS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Per-company driver status (spec.md §4.6 SUPPLEMENT, surfaced on
/// `GET /api/admin/services`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DriverStatus {
    Active,
    Degraded,
    Stopped,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStats {
    pub iterations: u64,
    pub successes: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSnapshot {
    pub company_name: String,
    pub status: DriverStatus,
    pub stats: DriverStats,
}

struct DriverState {
    status: DriverStatus,
    stats: DriverStats,
    consecutive_failures: u32,
    next_due_at_ms: u64,
}

impl DriverState {
    fn new(now_ms: u64) -> Self {
        Self { status: DriverStatus::Active, stats: DriverStats::default(), consecutive_failures: 0, next_due_at_ms: now_ms }
    }
}

/// Drives continuous synthetic traffic for every company the supervisor
/// currently tracks a running service for.
pub struct AutoLoadGenerator<P, H, C = bos_core::SystemClock>
where
    P: bos_adapters::ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    supervisor: Arc<ServiceSupervisor<P, H, C>>,
    orchestrator: Arc<JourneyOrchestrator<P, H, C>>,
    templates: Arc<ConfigStore>,
    clock: C,
    concurrency: Arc<Semaphore>,
    config: AutoLoadConfig,
    drivers: RwLock<HashMap<String, DriverState>>,
    cancellation: CancellationToken,
}

impl<P, H, C> AutoLoadGenerator<P, H, C>
where
    P: bos_adapters::ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    pub fn new(
        supervisor: Arc<ServiceSupervisor<P, H, C>>,
        orchestrator: Arc<JourneyOrchestrator<P, H, C>>,
        templates: Arc<ConfigStore>,
        clock: C,
        concurrency: Arc<Semaphore>,
        config: AutoLoadConfig,
    ) -> Arc<Self> {
        Arc::new(Self { supervisor, orchestrator, templates, clock, concurrency, config, drivers: RwLock::new(HashMap::new()), cancellation: CancellationToken::new() })
    }

    /// Snapshot every known driver's status and counters, for
    /// `GET /api/admin/services`.
    pub fn snapshot(&self) -> Vec<DriverSnapshot> {
        self.drivers
            .read()
            .iter()
            .map(|(company_name, state)| DriverSnapshot { company_name: company_name.clone(), status: state.status.clone(), stats: state.stats.clone() })
            .collect()
    }

    /// Signal every in-flight watch/dispatch loop to stop after its current
    /// tick (spec.md §9 "stops cleanly on shutdown signal").
    pub fn stop(&self) {
        self.cancellation.cancel();
    }

    /// Spawn the watch loop as a background task. No-op (never spawns a
    /// task) unless `config.enabled` is set.
    pub fn spawn(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            return None;
        }
        let generator = self;
        Some(tokio::spawn(async move { generator.run_watch_loop().await }))
    }

    async fn run_watch_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.config.watch_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = self.cancellation.cancelled() => {
                    tracing::info!("auto-load generator stopping");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One watch-loop tick: discover active companies, then fire a batch for
    /// every company whose `journeyIntervalMs` has elapsed.
    async fn tick(&self) {
        let companies = self.active_companies();
        let now_ms = self.clock.epoch_ms();

        {
            let mut drivers = self.drivers.write();
            drivers.retain(|company_name, _| companies.contains(company_name));
            for company_name in &companies {
                drivers.entry(company_name.clone()).or_insert_with(|| DriverState::new(now_ms));
            }
        }

        let due: Vec<String> = {
            let drivers = self.drivers.read();
            companies
                .into_iter()
                .filter(|company_name| drivers.get(company_name).is_some_and(|d| d.status == DriverStatus::Active && d.next_due_at_ms <= now_ms))
                .collect()
        };

        for company_name in due {
            self.dispatch_batch(&company_name).await;
        }
    }

    fn active_companies(&self) -> Vec<String> {
        let mut names: Vec<String> = self.supervisor.inventory().into_iter().map(|record| record.company_context.company_name).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Submit one batch of `batchSize` `SimulateJourney` calls in parallel
    /// for `company_name`, bounded by the shared concurrency semaphore.
    /// Batches that would exceed the bound are dropped, not queued
    /// (spec.md §4.6 "excess batches are skipped").
    async fn dispatch_batch(&self, company_name: &str) {
        let Some(template) = self.journey_template(company_name) else {
            tracing::debug!(company = company_name, "auto-load: no saved journey template, skipping batch");
            return;
        };

        let mut set = tokio::task::JoinSet::new();
        let mut dropped = 0u32;
        for _ in 0..self.config.batch_size {
            let permit = match Arc::clone(&self.concurrency).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };
            let orchestrator = self.orchestrator.clone();
            let journey = template.clone();
            set.spawn(async move {
                let _permit = permit;
                let correlation_id = bos_core::CorrelationId::new();
                orchestrator.run_steps(&journey, &SimulationOptions::default(), correlation_id, &std::collections::BTreeMap::new()).await
            });
        }
        if dropped > 0 {
            tracing::warn!(company = company_name, dropped, "auto-load: dropped batch entries, concurrency bound reached");
        }

        let mut successes = 0u64;
        let mut errors = 0u64;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Ok(_)) => successes += 1,
                Ok(Err(err)) => {
                    errors += 1;
                    tracing::warn!(company = company_name, error = %err, "auto-load journey failed");
                }
                Err(join_err) => {
                    errors += 1;
                    tracing::warn!(company = company_name, error = %join_err, "auto-load journey task panicked");
                }
            }
        }

        let submitted = successes + errors;
        let now_ms = self.clock.epoch_ms();
        let mut drivers = self.drivers.write();
        if let Some(state) = drivers.get_mut(company_name) {
            state.stats.iterations += 1;
            state.stats.successes += successes;
            state.stats.errors += errors;
            state.next_due_at_ms = now_ms + self.config.journey_interval.as_millis() as u64;

            if submitted == 0 {
                state.consecutive_failures += 1;
                if state.consecutive_failures >= DEGRADE_AFTER_CONSECUTIVE_FAILURES {
                    // Never auto-restarts once degraded (spec.md §4.6):
                    // `tick`'s due-filter only selects `Active` drivers, so
                    // this company stops being dispatched until an operator
                    // intervenes.
                    state.status = DriverStatus::Degraded;
                    tracing::warn!(company = company_name, "auto-load driver marked degraded after repeated failed batches");
                }
            } else {
                state.consecutive_failures = 0;
            }
        }
    }

    fn journey_template(&self, company_name: &str) -> Option<bos_core::JourneySpec> {
        let configs = self.templates.list().ok()?;
        configs.into_iter().filter(|config| config.company_name == company_name).max_by_key(|config| config.timestamp).map(|config| config.to_journey_spec())
    }
}

#[cfg(test)]
#[path = "autoload_tests.rs"]
mod tests;
