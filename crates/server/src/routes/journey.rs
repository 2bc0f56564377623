// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `POST /api/journey/simulate` and `POST /api/journey/simulate-multiple`
//! (spec.md §4.5, §4.8).

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use bos_adapters::{HttpClient, ProcessAdapter};
use bos_core::{Clock, JourneyRunResult};
use bos_wire::{JourneyOutcome, SimulateJourneyRequest, SimulateMultipleRequest, SimulateMultipleResponse};

use crate::error::ServerError;
use crate::state::AppState;

fn engine_options(options: &bos_wire::journey::SimulationOptions) -> bos_engine::SimulationOptions {
    bos_engine::SimulationOptions {
        chained: options.chained,
        think_time_ms: options.think_time_ms,
        error_simulation_enabled: options.error_simulation_enabled,
    }
}

/// Lowercases every inbound header name (`HeaderName::as_str` already does
/// this, so this just collects) into the map [`bos_wire::headers::build_propagated_headers`]
/// expects, so a caller's own correlation/tracing headers can be forwarded to
/// the journey's `/process` calls (spec.md §4.5 "Correlation propagation").
fn inbound_headers_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string())))
        .collect()
}

pub async fn simulate_journey<P, H, C>(
    State(state): State<Arc<AppState<P, H, C>>>,
    headers: HeaderMap,
    Json(body): Json<SimulateJourneyRequest>,
) -> Result<Json<JourneyRunResult>, ServerError>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let options = engine_options(&body.options);
    let inbound = inbound_headers_map(&headers);
    let result = state.orchestrator.simulate_journey(&body.journey, &options, &inbound).await?;
    Ok(Json(result))
}

/// Unlike [`simulate_journey`], a per-customer failure never fails the whole
/// request — it surfaces as [`JourneyOutcome::Error`] in `results` so one bad
/// customer in a batch doesn't hide the other `customerCount - 1` outcomes.
pub async fn simulate_multiple<P, H, C>(
    State(state): State<Arc<AppState<P, H, C>>>,
    headers: HeaderMap,
    Json(body): Json<SimulateMultipleRequest>,
) -> Json<SimulateMultipleResponse>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let options = engine_options(&body.options);
    let inbound = inbound_headers_map(&headers);
    let raw = state.orchestrator.simulate_multiple_customers(&body.journey, body.customer_count, &options, &inbound).await;
    let results = raw
        .into_iter()
        .map(|outcome| match outcome {
            Ok(run) => JourneyOutcome::Result(run),
            Err(err) => JourneyOutcome::Error { message: err.to_string() },
        })
        .collect();
    Json(SimulateMultipleResponse { results })
}

#[cfg(test)]
#[path = "journey_tests.rs"]
mod tests;
