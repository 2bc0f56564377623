// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the engine's components (ports, flags, supervisor, orchestrator,
//! fan-out, auto-load, saved-journey configs) into the shared state every
//! axum handler reads from.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use bos_adapters::{HttpClient, ProcessAdapter, ReqwestHttpClient};
use bos_core::{Clock, SystemClock};
use bos_engine::{AutoLoadGenerator, EventFanout, FlagStore, JourneyOrchestrator, PortAllocator, ServiceSupervisor};
use bos_runbook::ConfigStore;
use bos_storage::FsCheckpointWriter;

/// Everything a route handler needs, generic over the process/HTTP/clock
/// seams so tests can substitute `bos-adapters`' fakes the same way
/// `bos-engine`'s own unit tests do.
pub struct AppState<P, H, C = SystemClock>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    pub ports: Arc<PortAllocator<FsCheckpointWriter, C>>,
    pub flags: Arc<FlagStore<FsCheckpointWriter, C>>,
    pub supervisor: Arc<ServiceSupervisor<P, H, C>>,
    pub orchestrator: Arc<JourneyOrchestrator<P, H, C>>,
    pub fanout: Arc<EventFanout>,
    pub autoload: Arc<AutoLoadGenerator<P, H, C>>,
    pub configs: Arc<ConfigStore>,
    pub started_at: Instant,
    pub port_range: (u16, u16),
    pub preserved_services: Vec<String>,
    pub child_binary_path: PathBuf,
    pub engine_base_url: String,
}

impl<P, H, C> AppState<P, H, C>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    pub fn uptime_sec(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// The concrete instantiation the binary runs: real OS processes, real
/// `reqwest` HTTP calls, real wall-clock time.
pub type ProdAppState = AppState<bos_adapters::OsProcessAdapter, ReqwestHttpClient, SystemClock>;
