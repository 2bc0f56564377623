// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process startup and shutdown (spec.md §6, §9): load persisted state,
//! reclaim stale ports, bind the public HTTP port, optionally start the
//! Auto-Load Generator, then serve until `SIGTERM`/`SIGINT` — at which point
//! auto-load stops, in-flight requests and queued fan-out events get a
//! bounded grace window to drain, and the process exits.
//!
//! Modeled on `bos-child::main`'s `CancellationToken` +
//! `axum::serve(...).with_graceful_shutdown(...)` pattern, generalized with
//! the extra startup work a stateful server needs that a stateless child
//! process doesn't (persisted ports/flags, the auto-load watch loop).

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use bos_adapters::{OsProcessAdapter, ReqwestHttpClient};
use bos_core::{Clock, ServiceName, SystemClock};
use bos_engine::{AutoLoadConfig, AutoLoadGenerator, EventFanout, EventSink, FlagStore, JourneyOrchestrator, PortAllocator, ServiceSupervisor, SupervisorConfig};
use bos_runbook::ConfigStore;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::env;
use crate::state::{AppState, ProdAppState};

/// Assemble every engine component from the process environment (spec.md
/// §6). Returns an error for anything that should abort startup with exit
/// code 1: unreadable persisted state, an unbindable main port range, or a
/// malformed table on disk.
pub async fn build_state() -> anyhow::Result<Arc<ProdAppState>> {
    let state_dir = env::state_dir();
    std::fs::create_dir_all(&state_dir)?;
    let config_dir = env::config_dir();
    std::fs::create_dir_all(&config_dir)?;

    let http = Arc::new(ReqwestHttpClient::new());

    let destination_url = env::fanout_destination_url().unwrap_or_else(|| format!("{}/__no_fanout_destination_configured", env::engine_base_url()));
    let fanout = Arc::new(EventFanout::spawn(http.clone(), destination_url, None));
    let sink: Arc<dyn EventSink> = fanout.clone();

    let (range_min, range_max) = env::service_port_range();
    let ports = Arc::new(PortAllocator::open(env::port_table_path(), range_min, range_max)?);
    // Startup trust window aside, an explicit sweep here clears anything the
    // previous process had already marked released before it exited.
    ports.cleanup_stale()?;

    let flags = Arc::new(FlagStore::open(env::flag_table_path(), sink.clone())?);
    let configs = Arc::new(ConfigStore::open(config_dir));

    let preserved: HashSet<ServiceName> = env::preserved_services().into_iter().map(ServiceName::from).collect();
    let supervisor_config = SupervisorConfig { binary_path: env::child_binary_path(), engine_base_url: env::engine_base_url(), preserved: preserved.clone() };
    let supervisor = Arc::new(ServiceSupervisor::new(Arc::new(OsProcessAdapter), http.clone(), ports.clone(), SystemClock, supervisor_config));

    let concurrency = Arc::new(Semaphore::new(env::max_concurrent()));
    let orchestrator = Arc::new(JourneyOrchestrator::new(supervisor.clone(), http.clone(), sink, SystemClock, concurrency.clone()));

    let autoload_config = AutoLoadConfig {
        enabled: env::enable_continuous_journeys(),
        watch_interval: env::watch_interval(),
        journey_interval: env::journey_interval(),
        batch_size: env::journey_batch_size(),
    };
    let autoload = AutoLoadGenerator::new(supervisor.clone(), orchestrator.clone(), configs.clone(), SystemClock, concurrency, autoload_config);
    autoload.clone().spawn();

    Ok(Arc::new(AppState {
        ports,
        flags,
        supervisor,
        orchestrator,
        fanout,
        autoload,
        configs,
        started_at: Instant::now(),
        port_range: (range_min, range_max),
        preserved_services: preserved.into_iter().map(|name| name.as_str().to_string()).collect(),
        child_binary_path: env::child_binary_path(),
        engine_base_url: env::engine_base_url(),
    }))
}

/// Bind the main HTTP port and serve until a shutdown signal arrives, then
/// drain (spec.md §6 "bounded grace ≤10s", §4.7).
pub async fn serve(state: Arc<ProdAppState>) -> anyhow::Result<()> {
    let router = crate::build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", env::port())).await?;
    tracing::info!(port = env::port(), "bos-server listening");

    let shutdown = CancellationToken::new();
    let shutdown_for_serve = shutdown.clone();
    let serve_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_for_serve.cancelled().await;
            })
            .await
    });

    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    tokio::select! {
        _ = sigterm.recv() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    tracing::info!("received shutdown signal, draining in-flight requests and queued events");
    state.autoload.stop();
    shutdown.cancel();

    let drain = env::drain_timeout().min(std::time::Duration::from_secs(10));
    match tokio::time::timeout(drain, serve_handle).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_err)) => return Err(join_err.into()),
        Err(_) => tracing::warn!("drain timeout elapsed, forcing exit"),
    }

    state.fanout.shutdown();
    tracing::info!("bos-server stopped");
    Ok(())
}
