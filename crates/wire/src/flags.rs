// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feature-flag endpoints (spec.md §4.2, §4.8): list/get/put/delete plus
//! the remediation-workflow variants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use bos_core::{FlagName, FlagSet, FlagValue, ServiceName};

/// `GET /api/feature_flag[?service=][?companyName=][?journey=]` query params.
///
/// Per spec.md §4.2 "Currently-running view", `company_name`/`journey` are
/// accepted but do not yet partition `overrides` — callers get global flags
/// plus the unpartitioned currently-running inventory regardless.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagListQuery {
    pub service: Option<String>,
    pub company_name: Option<String>,
    pub journey: Option<String>,
}

/// Response for `GET /api/feature_flag`: the effective set for `service` if
/// given, else the global set, plus the currently-running inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagListResponse {
    pub flags: FlagSet,
    pub overrides: BTreeMap<ServiceName, FlagSet>,
    pub currently_running: Vec<CurrentlyRunningEntry>,
}

/// One entry of the "currently running" inventory block (spec.md §4.2,
/// §9 Open Question: not partitioned by company/journey today).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentlyRunningEntry {
    pub service_name: ServiceName,
    pub company_name: String,
    pub journey_type: String,
}

/// `GET /api/feature_flag/:name` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagGetResponse {
    pub name: FlagName,
    pub value: FlagValue,
    pub default: FlagValue,
}

/// `PUT /api/feature_flag/:name` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagPutRequest {
    pub value: FlagValue,
    pub target_service: Option<ServiceName>,
    pub reason: Option<String>,
    pub triggered_by: Option<String>,
}

/// `DELETE /api/feature_flag/:name[?targetService=]` query params.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDeleteQuery {
    pub target_service: Option<ServiceName>,
}

/// `POST /api/remediation/feature-flag` body — same shape as
/// [`FlagPutRequest`] plus the flag name, since the remediation surface
/// isn't nested under a `:name` path segment (spec.md §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationRequest {
    pub flag_name: FlagName,
    pub value: FlagValue,
    pub target_service: Option<ServiceName>,
    pub reason: Option<String>,
    pub problem_id: Option<String>,
}

/// One item of `POST /api/remediation/feature-flags/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationItem {
    pub flag_name: FlagName,
    pub value: FlagValue,
    pub target_service: Option<ServiceName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRemediationRequest {
    pub items: Vec<RemediationItem>,
    pub reason: Option<String>,
    pub problem_id: Option<String>,
}
