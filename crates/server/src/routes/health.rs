// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /health`, `GET /api/health`, `GET /api/health/detailed` (spec.md
//! §4.8). The first two are identical and both kept for compatibility with
//! load balancers that only ever probe the bare path.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::Json;

use bos_adapters::{HttpClient, ProcessAdapter};
use bos_core::{Clock, ServiceState};
use bos_wire::{DetailedHealthResponse, HealthResponse};

use crate::state::AppState;

pub async fn health<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>) -> Json<HealthResponse>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    Json(HealthResponse { status: "ok".to_string(), uptime_sec: state.uptime_sec() })
}

pub async fn health_detailed<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>) -> Json<DetailedHealthResponse>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let services = state.supervisor.inventory();
    let services_healthy = services.iter().filter(|record| record.state == ServiceState::Healthy).count();
    let services_unhealthy = services.iter().filter(|record| record.state == ServiceState::Unhealthy).count();
    let metrics = state.fanout.metrics();

    Json(DetailedHealthResponse {
        status: "ok".to_string(),
        uptime_sec: state.uptime_sec(),
        services_healthy,
        services_unhealthy,
        ports_allocated: state.ports.snapshot().len(),
        event_queue_depth: state.fanout.depth(),
        event_queue_dropped: metrics.dropped.load(Ordering::Relaxed),
        event_delivery_failed: metrics.delivery_failed.load(Ordering::Relaxed),
    })
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
