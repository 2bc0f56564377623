// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bos-child: the Child Service Runtime (spec.md §4.3), one process per
//! journey step. Receives `/process` calls from the orchestrator, applies
//! the service's effective fault-injection flags, simulates its declared
//! substep work, and reports its outcome — it never talks to the Flag
//! Store except to read flags, and never talks to the event fan-out at all.

pub mod env;
pub mod fault;
pub mod minute_fuse;
pub mod routes;
pub mod state;
pub mod substeps;
pub mod visit;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use state::ChildState;

/// Build the child's axum router, generic over nothing but `state` so tests
/// can drive it with `tower::ServiceExt::oneshot` without a real listener.
pub fn build_router(state: Arc<ChildState>) -> Router {
    Router::new().route("/health", get(routes::health)).route("/process", post(routes::process)).with_state(state)
}
