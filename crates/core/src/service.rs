// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child-service bookkeeping (spec.md §3 "ServiceRecord", §4.4 state machine).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A service's identity key, e.g. `CheckoutService-acme`.
///
/// Unlike [`crate::JourneyId`]/[`crate::CorrelationId`] this is not a random
/// id — it is derived deterministically from step name + company name
/// (see [`crate::journey::derive_service_name`]) and is used as the map key
/// everywhere a service is tracked (port table, flag overrides, supervisor
/// inventory).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(pub String);

impl ServiceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ServiceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServiceName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for ServiceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of a [`ServiceRecord`] (spec.md §4.4 state machine:
/// `absent -> starting -> healthy <-> unhealthy -> stopping -> absent`).
///
/// `Absent` is never represented explicitly — the supervisor simply has no
/// record for that service name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Starting,
    Healthy,
    Unhealthy,
    Stopping,
}

crate::simple_display! {
    ServiceState {
        Starting => "starting",
        Healthy => "healthy",
        Unhealthy => "unhealthy",
        Stopping => "stopping",
    }
}

impl ServiceState {
    /// Valid transitions per the state machine in spec.md §4.4.
    pub fn can_transition_to(self, next: ServiceState) -> bool {
        use ServiceState::*;
        matches!(
            (self, next),
            (Starting, Healthy)
                | (Starting, Stopping)
                | (Healthy, Unhealthy)
                | (Healthy, Stopping)
                | (Unhealthy, Healthy)
                | (Unhealthy, Stopping)
        )
    }
}

/// The supervisor's record of one live (or starting/stopping) child service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub service_name: ServiceName,
    pub pid: u32,
    pub port: u16,
    /// Epoch milliseconds when the service was launched.
    pub start_time_ms: u64,
    /// Epoch milliseconds of the last successful health check, if any.
    pub last_healthy_at_ms: Option<u64>,
    pub company_context: CompanyContext,
    pub journey_type: String,
    pub state: ServiceState,
}

/// The subset of journey context a service needs for its launch environment
/// and for grouping in the supervisor's per-company inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContext {
    pub company_name: String,
    pub domain: String,
    pub industry_type: String,
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
