// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `POST /api/journey/simulate` and `/api/journey/simulate-multiple`
//! request bodies (spec.md §4.5, §4.8).

use serde::{Deserialize, Serialize};

use bos_core::{JourneyRunResult, JourneySpec};

/// Options shared by both single- and multi-customer simulation, per
/// spec.md §4.5 `SimulateJourney(journeySpec, {chained, thinkTimeMs,
/// errorSimulationEnabled})`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOptions {
    #[serde(default)]
    pub chained: bool,
    pub think_time_ms: Option<u64>,
    pub error_simulation_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateJourneyRequest {
    pub journey: JourneySpec,
    #[serde(flatten)]
    pub options: SimulationOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateMultipleRequest {
    pub journey: JourneySpec,
    pub customer_count: u32,
    #[serde(flatten)]
    pub options: SimulationOptions,
}

/// One customer's outcome in a `POST /api/journey/simulate-multiple`
/// response, in submission order.
///
/// Almost every run produces [`JourneyOutcome::Result`]; the error variant
/// only appears for an individual customer task that panicked or whose
/// concurrency permit was never granted — the shared-service startup failure
/// that would otherwise affect the whole batch already short-circuits before
/// any customer task runs (spec.md §4.5 SUPPLEMENT).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JourneyOutcome {
    Result(JourneyRunResult),
    Error {
        #[serde(rename = "error")]
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateMultipleResponse {
    pub results: Vec<JourneyOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bos_core::test_support::sample_journey;

    #[test]
    fn simulate_journey_request_deserializes_flattened_options() {
        let journey = sample_journey("Acme");
        let body = serde_json::json!({
            "journey": journey,
            "chained": true,
            "thinkTimeMs": 250,
        });
        let req: SimulateJourneyRequest = serde_json::from_value(body).expect("deserialize");
        assert!(req.options.chained);
        assert_eq!(req.options.think_time_ms, Some(250));
    }

    #[test]
    fn simulate_multiple_request_defaults_chained_to_false() {
        let journey = sample_journey("Acme");
        let body = serde_json::json!({ "journey": journey, "customerCount": 10 });
        let req: SimulateMultipleRequest = serde_json::from_value(body).expect("deserialize");
        assert_eq!(req.customer_count, 10);
        assert!(!req.options.chained);
    }

    #[test]
    fn journey_outcome_error_variant_serializes_as_error_field() {
        let outcome = JourneyOutcome::Error { message: "no free port".to_string() };
        let json = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(json["error"], "no free port");
    }
}
