// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /api/ports` and `POST /api/ports/cleanup` (spec.md §4.1, §4.8).

use serde::{Deserialize, Serialize};

use bos_core::PortAllocation;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortsResponse {
    pub allocations: Vec<PortAllocation>,
    pub range_min: u16,
    pub range_max: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortsCleanupResponse {
    pub released: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bos_core::ServiceName;

    #[test]
    fn ports_response_round_trips_camel_case() {
        let resp = PortsResponse {
            allocations: vec![PortAllocation {
                port: 20001,
                service_name: ServiceName::from("CheckoutService-acme"),
                allocated_at_ms: 1_000,
                released_at_ms: None,
            }],
            range_min: 20000,
            range_max: 20999,
        };
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["rangeMin"], 20000);
        assert_eq!(json["allocations"][0]["serviceName"], "CheckoutService-acme");
    }
}
