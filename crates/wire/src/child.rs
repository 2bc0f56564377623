// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Child Service Runtime's `/health` and `/process` wire shapes
//! (spec.md §4.3).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use bos_core::{CorrelationId, CustomerProfile, JourneyId, SubstepSpec};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildHealthResponse {
    pub status: String,
    pub service_name: String,
    pub pid: u32,
    pub uptime_sec: u64,
}

/// `POST /process` input (spec.md §4.3 step payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub correlation_id: CorrelationId,
    pub journey_id: JourneyId,
    pub step_name: String,
    #[serde(default)]
    pub substeps: Vec<SubstepSpec>,
    #[serde(default)]
    pub customer_profile: CustomerProfile,
    #[serde(flatten)]
    pub additional_fields: HashMap<String, Value>,
}

/// `POST /process` output (spec.md §4.3 step payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub status: String,
    pub http_status: u16,
    pub processing_time_ms: u64,
    pub correlation_id: CorrelationId,
    pub step_name: String,
    pub service_name: String,
    #[serde(default)]
    pub additional_fields: HashMap<String, Value>,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
    /// Which flag fired, if this is an error response (spec.md §4.3 step 5
    /// "set ... `feature_flag`").
    pub feature_flag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bos_core::{CorrelationId, JourneyId};

    #[test]
    fn process_request_captures_additional_fields() {
        let body = serde_json::json!({
            "correlationId": "cor-abc",
            "journeyId": "jrn-abc",
            "stepName": "Checkout",
            "substeps": [{"substepName": "validate_cart", "durationMs": 60}],
            "customerProfile": {"tier": "gold"},
            "sessionId": "sess-1",
        });
        let req: ProcessRequest = serde_json::from_value(body).expect("deserialize");
        assert_eq!(req.step_name, "Checkout");
        assert_eq!(req.additional_fields.get("sessionId").unwrap(), "sess-1");
    }

    #[test]
    fn process_response_round_trips_error_fields() {
        let resp = ProcessResponse {
            status: "failed".into(),
            http_status: 503,
            processing_time_ms: 10,
            correlation_id: CorrelationId::new(),
            step_name: "Payment".into(),
            service_name: "PaymentService-acme".into(),
            additional_fields: HashMap::new(),
            error_type: Some("service_unavailable".into()),
            error_message: Some("downstream unavailable".into()),
            feature_flag: Some("errors_per_transaction".into()),
        };
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["httpStatus"], 503);
        assert_eq!(json["featureFlag"], "errors_per_transaction");
        let _jid = JourneyId::new();
    }
}
