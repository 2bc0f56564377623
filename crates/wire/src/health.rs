// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /health`, `GET /api/health`, `GET /api/health/detailed`
//! (spec.md §4.8).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_sec: u64,
}

/// `GET /api/health/detailed`: aggregated liveness across every owned
/// subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    pub status: String,
    pub uptime_sec: u64,
    pub services_healthy: usize,
    pub services_unhealthy: usize,
    pub ports_allocated: usize,
    pub event_queue_depth: usize,
    pub event_queue_dropped: u64,
    pub event_delivery_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_round_trips() {
        let resp = HealthResponse { status: "ok".into(), uptime_sec: 42 };
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["uptimeSec"], 42);
    }
}
