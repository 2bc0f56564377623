// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /api/admin/services[/status]` and `POST /api/admin/reset-and-restart`
//! (spec.md §4.4, §4.6, §4.8).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use bos_core::ServiceRecord;

/// Per-company auto-load driver status surfaced alongside the inventory
/// (SPEC_FULL.md [SUPPLEMENT] — spec.md §4.6 describes driver degradation
/// but not how an operator observes it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatusEntry {
    Active,
    Degraded,
    Stopped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesResponse {
    pub services: Vec<ServiceRecord>,
    pub autoload: BTreeMap<String, DriverStatusEntry>,
}

/// `GET /api/admin/services/status`: a cheaper healthy/unhealthy rollup
/// without the full per-service record payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesStatusResponse {
    pub total: usize,
    pub healthy: usize,
    pub unhealthy: usize,
    pub starting: usize,
    pub stopping: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetAndRestartResponse {
    pub stopped: usize,
    pub restarted: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn services_status_response_round_trips() {
        let resp = ServicesStatusResponse { total: 3, healthy: 2, unhealthy: 1, starting: 0, stopping: 0 };
        let json = serde_json::to_value(&resp).expect("serialize");
        let back: ServicesStatusResponse = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back.healthy, 2);
    }

    #[test]
    fn driver_status_entry_serializes_snake_case() {
        let json = serde_json::to_value(DriverStatusEntry::Degraded).expect("serialize");
        assert_eq!(json, "degraded");
    }
}
