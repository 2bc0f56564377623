// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! bos-server: the Public API (spec.md §4.8) — wires the engine's
//! components (`bos-engine`) behind an axum router, and owns the process's
//! startup/shutdown lifecycle.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod runtime;
pub mod state;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use bos_adapters::{HttpClient, ProcessAdapter};
use bos_core::Clock;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full public router, generic over the same process/HTTP/clock
/// seams as [`AppState`] so tests can drive it with
/// `tower::ServiceExt::oneshot` the way `bos-child::build_router` is driven.
pub fn build_router<P, H, C>(state: Arc<AppState<P, H, C>>) -> Router
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/journey/simulate", post(routes::journey::simulate_journey))
        .route("/api/journey/simulate-multiple", post(routes::journey::simulate_multiple))
        .route("/api/feature_flag", get(routes::flags::list_flags))
        .route(
            "/api/feature_flag/:name",
            get(routes::flags::get_flag).put(routes::flags::put_flag).delete(routes::flags::delete_flag),
        )
        .route("/api/feature_flag/service/:name", delete(routes::flags::delete_service_overrides))
        .route("/api/remediation/feature-flag", post(routes::flags::remediate_flag))
        .route("/api/remediation/feature-flags/bulk", post(routes::flags::remediate_flags_bulk))
        .route("/api/admin/services", get(routes::admin::list_services))
        .route("/api/admin/services/status", get(routes::admin::services_status))
        .route("/api/admin/reset-and-restart", post(routes::admin::reset_and_restart))
        .route("/api/ports", get(routes::ports::list_ports))
        .route("/api/ports/cleanup", post(routes::ports::cleanup_ports))
        .route("/health", get(routes::health::health))
        .route("/api/health", get(routes::health::health))
        .route("/api/health/detailed", get(routes::health::health_detailed))
        .layer(axum::middleware::from_fn(middleware::echo_correlation_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
