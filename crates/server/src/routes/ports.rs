// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /api/ports` and `POST /api/ports/cleanup` (spec.md §4.1, §4.8).

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use bos_adapters::{HttpClient, ProcessAdapter};
use bos_core::Clock;
use bos_wire::{PortsCleanupResponse, PortsResponse};

use crate::error::ServerError;
use crate::state::AppState;

pub async fn list_ports<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>) -> Json<PortsResponse>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    Json(PortsResponse { allocations: state.ports.snapshot(), range_min: state.port_range.0, range_max: state.port_range.1 })
}

pub async fn cleanup_ports<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>) -> Result<Json<PortsCleanupResponse>, ServerError>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let released = state.ports.cleanup_stale()?;
    Ok(Json(PortsCleanupResponse { released }))
}

#[cfg(test)]
#[path = "ports_tests.rs"]
mod tests;
