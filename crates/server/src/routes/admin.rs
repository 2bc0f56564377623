// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /api/admin/services[/status]` and `POST /api/admin/reset-and-restart`
//! (spec.md §4.4, §4.6, §4.8).

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use bos_adapters::{HttpClient, ProcessAdapter};
use bos_core::{Clock, ServiceState};
use bos_engine::autoload::DriverStatus;
use bos_wire::{DriverStatusEntry, ResetAndRestartResponse, ServicesResponse, ServicesStatusResponse};

use crate::state::AppState;

pub async fn list_services<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>) -> Json<ServicesResponse>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let services = state.supervisor.inventory();
    let autoload = state
        .autoload
        .snapshot()
        .into_iter()
        .map(|driver| {
            let status = match driver.status {
                DriverStatus::Active => DriverStatusEntry::Active,
                DriverStatus::Degraded => DriverStatusEntry::Degraded,
                DriverStatus::Stopped => DriverStatusEntry::Stopped,
            };
            (driver.company_name, status)
        })
        .collect();
    Json(ServicesResponse { services, autoload })
}

pub async fn services_status<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>) -> Json<ServicesStatusResponse>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let services = state.supervisor.inventory();
    let mut response = ServicesStatusResponse { total: services.len(), healthy: 0, unhealthy: 0, starting: 0, stopping: 0 };
    for record in &services {
        match record.state {
            ServiceState::Healthy => response.healthy += 1,
            ServiceState::Unhealthy => response.unhealthy += 1,
            ServiceState::Starting => response.starting += 1,
            ServiceState::Stopping => response.stopping += 1,
        }
    }
    Json(response)
}

/// Tears every tracked service down (preserved infrastructure exempted, per
/// `SupervisorConfig::preserved`) without restarting anything — the
/// supervisor re-discovers live state by `EnsureService` on the next journey
/// submission rather than this endpoint eagerly respawning services with no
/// journey to run yet (spec.md §4.4 SUPPLEMENT, Open Question: "restart"
/// here means "make way for a clean restart", not "relaunch now").
pub async fn reset_and_restart<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>) -> Json<ResetAndRestartResponse>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let stopped = state.supervisor.inventory().len();
    state.supervisor.stop_all().await;
    Json(ResetAndRestartResponse { stopped, restarted: Vec::new() })
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
