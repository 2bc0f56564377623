// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the Child Service Runtime (spec.md §4.3): `GET /health`
//! always reports healthy regardless of flag state, `POST /process` runs the
//! fault-injection decision and simulates the step's declared work.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bos_core::FlagName;
use bos_wire::{ChildHealthResponse, ProcessRequest, ProcessResponse};
use tracing::{info, warn};

use crate::fault::{self, FaultOutcome};
use crate::state::ChildState;
use crate::substeps;

pub async fn health(State(state): State<Arc<ChildState>>) -> Json<ChildHealthResponse> {
    Json(ChildHealthResponse {
        status: "healthy".to_string(),
        service_name: state.identity.service_name.clone(),
        pid: state.pid,
        uptime_sec: state.uptime_sec(),
    })
}

pub async fn process(State(state): State<Arc<ChildState>>, Json(request): Json<ProcessRequest>) -> Response {
    let started = Instant::now();
    let flags = state.effective_flags().await;

    let visit_rate = flags.get(&FlagName::ErrorsPerVisit).and_then(|v| v.as_f64()).unwrap_or(0.0);
    let minute_budget = flags.get(&FlagName::ErrorsPerMinute).and_then(|v| v.as_f64()).unwrap_or(0.0);
    let visit_error = state.visit_error(request.correlation_id, visit_rate);

    let outcome = state.with_rng(|rng| fault::decide(&flags, rng, visit_error, || state.minute_fuse_fires(minute_budget)));

    let base_duration_ms = state.with_rng(|rng| substeps::accumulate_duration(&request.substeps, rng));

    let (extra_ms, http_status, error_type, error_message, feature_flag) = match &outcome {
        FaultOutcome::Success => (0, 200, None, None, None),
        FaultOutcome::SlowResponse { extra_ms } => (*extra_ms, 200, None, None, None),
        FaultOutcome::Error { kind, flag_name } => {
            warn!(service = %state.identity.service_name, correlation_id = %request.correlation_id, flag = %flag_name, "injecting fault");
            (0, kind.http_status(), Some(kind.to_string()), Some(format!("simulated {kind} from {flag_name}")), Some(flag_name.as_wire_str().to_string()))
        }
    };

    tokio::time::sleep(std::time::Duration::from_millis(base_duration_ms + extra_ms)).await;

    let processing_time_ms = started.elapsed().as_millis() as u64;
    info!(service = %state.identity.service_name, correlation_id = %request.correlation_id, step = %request.step_name, status = http_status, "processed step");

    let body = ProcessResponse {
        status: if error_type.is_some() { "failed".to_string() } else { "completed".to_string() },
        http_status,
        processing_time_ms,
        correlation_id: request.correlation_id,
        step_name: request.step_name,
        service_name: state.identity.service_name.clone(),
        additional_fields: Default::default(),
        error_type,
        error_message,
        feature_flag,
    };

    let status = StatusCode::from_u16(http_status).unwrap_or(StatusCode::OK);
    (status, Json(body)).into_response()
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
