// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events fanned out to the observability sink (spec.md §3 "ChangeEvent",
//! "BusinessEvent", §4.7 "Event Fan-out").

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::flags::{FlagName, FlagValue};
use crate::service::ServiceName;
use crate::{CorrelationId, JourneyId};

/// Where a [`ChangeEvent`] applies: the global flag set, or one service's
/// override map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scopeType", rename_all = "camelCase")]
pub enum EventScope {
    Global,
    Service { service_name: ServiceName },
}

impl fmt::Display for EventScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventScope::Global => f.write_str("global"),
            EventScope::Service { service_name } => write!(f, "service:{service_name}"),
        }
    }
}

/// Emitted whenever the Flag Store accepts a mutation (spec.md §4.2, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    #[serde(rename = "eventType")]
    pub event_type: ChangeEventType,
    pub flag_name: FlagName,
    pub previous_value: Option<FlagValue>,
    pub new_value: FlagValue,
    pub scope: EventScope,
    pub reason: Option<String>,
    pub triggered_by: String,
    pub problem_id: Option<String>,
    pub timestamp_ms: u64,
}

/// Always `"CHANGE"` on the wire — kept as a unit enum so serde enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEventType {
    #[serde(rename = "CHANGE")]
    Change,
}

/// Emitted once per completed (or failed) journey step (spec.md §4.5, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessEvent {
    #[serde(rename = "eventType")]
    pub event_type: BusinessEventType,
    pub correlation_id: CorrelationId,
    pub journey_id: JourneyId,
    pub step_name: String,
    pub service_name: ServiceName,
    pub company_name: String,
    pub status: String,
    pub processing_time_ms: u64,
    #[serde(flatten)]
    pub additional_fields: HashMap<String, Value>,
    pub timestamp_ms: u64,
}

/// Always `"BIZ"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessEventType {
    #[serde(rename = "BIZ")]
    Biz,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
