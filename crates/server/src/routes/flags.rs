// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feature-flag CRUD and remediation-workflow endpoints (spec.md §4.2,
//! §4.8): `GET/PUT/DELETE /api/feature_flag[/:name]`,
//! `DELETE /api/feature_flag/service/:name`, and
//! `POST /api/remediation/feature-flag[s/bulk]`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use bos_adapters::{HttpClient, ProcessAdapter};
use bos_core::{Clock, FlagName, ServiceName};
use bos_wire::{BulkRemediationRequest, CurrentlyRunningEntry, FlagDeleteQuery, FlagGetResponse, FlagListQuery, FlagListResponse, FlagPutRequest, RemediationRequest};

use crate::error::ServerError;
use crate::state::AppState;

fn parse_flag_name(raw: &str) -> Result<FlagName, ServerError> {
    FlagName::parse(raw).ok_or_else(|| ServerError::not_found(format!("unknown feature flag: {raw}")))
}

pub async fn list_flags<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>, Query(query): Query<FlagListQuery>) -> Json<FlagListResponse>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let flags = match &query.service {
        Some(service) => state.flags.get_effective(&ServiceName::from(service.as_str())),
        None => state.flags.get_global(),
    };
    let overrides = state.flags.get_overrides();

    let currently_running = state
        .supervisor
        .inventory()
        .into_iter()
        .filter(|record| query.company_name.as_deref().map_or(true, |name| record.company_context.company_name == name))
        .filter(|record| query.journey.as_deref().map_or(true, |journey| record.journey_type == journey))
        .map(|record| CurrentlyRunningEntry { service_name: record.service_name, company_name: record.company_context.company_name, journey_type: record.journey_type })
        .collect();

    Json(FlagListResponse { flags, overrides, currently_running })
}

pub async fn get_flag<P, H, C>(
    State(state): State<Arc<AppState<P, H, C>>>,
    Path(name): Path<String>,
    Query(query): Query<FlagListQuery>,
) -> Result<Json<FlagGetResponse>, ServerError>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let flag_name = parse_flag_name(&name)?;
    let value = match &query.service {
        Some(service) => state.flags.get_effective(&ServiceName::from(service.as_str()))[&flag_name],
        None => state.flags.get_global()[&flag_name],
    };
    Ok(Json(FlagGetResponse { name: flag_name, value, default: flag_name.default_value() }))
}

pub async fn put_flag<P, H, C>(
    State(state): State<Arc<AppState<P, H, C>>>,
    Path(name): Path<String>,
    Json(body): Json<FlagPutRequest>,
) -> Result<Json<FlagGetResponse>, ServerError>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let flag_name = parse_flag_name(&name)?;
    let triggered_by = body.triggered_by.as_deref().unwrap_or("operator");
    let value = match body.target_service {
        Some(service) => state.flags.set_service_override(service, flag_name, body.value, body.reason, triggered_by, None)?,
        None => state.flags.set_global(flag_name, body.value, body.reason, triggered_by, None)?,
    };
    Ok(Json(FlagGetResponse { name: flag_name, value, default: flag_name.default_value() }))
}

/// `DELETE /api/feature_flag/:name[?targetService=]`: with `targetService`,
/// clears that one service's override for `name`; without it, resets the
/// global default for `name` (spec.md §4.2 "delete-then-get returns
/// default").
pub async fn delete_flag<P, H, C>(
    State(state): State<Arc<AppState<P, H, C>>>,
    Path(name): Path<String>,
    Query(query): Query<FlagDeleteQuery>,
) -> Result<StatusCode, ServerError>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let flag_name = parse_flag_name(&name)?;
    match query.target_service {
        Some(service) => state.flags.clear_service_override(&service, flag_name, "operator")?,
        None => {
            state.flags.set_global(flag_name, flag_name.default_value(), None, "operator", None)?;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/feature_flag/service/:name`: clears every override held for
/// the named service in one call (spec.md §4.2), distinct from
/// [`delete_flag`] with `targetService` set, which clears a single key.
pub async fn delete_service_overrides<P, H, C>(State(state): State<Arc<AppState<P, H, C>>>, Path(service_name): Path<String>) -> Result<StatusCode, ServerError>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    state.flags.clear_all_overrides_for_service(&ServiceName::from(service_name.as_str()), "operator")?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remediate_flag<P, H, C>(
    State(state): State<Arc<AppState<P, H, C>>>,
    Json(body): Json<RemediationRequest>,
) -> Result<Json<FlagGetResponse>, ServerError>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    let flag_name = body.flag_name;
    let value = match body.target_service {
        Some(service) => state.flags.set_service_override(service, flag_name, body.value, body.reason, "remediation-workflow", body.problem_id)?,
        None => state.flags.set_global(flag_name, body.value, body.reason, "remediation-workflow", body.problem_id)?,
    };
    Ok(Json(FlagGetResponse { name: flag_name, value, default: flag_name.default_value() }))
}

/// Applies each item independently rather than as one transaction: the
/// engine's flag store exposes no multi-flag commit, so a validation failure
/// partway through `items` leaves the earlier items already applied
/// (spec.md §4.8 SUPPLEMENT — an Open Question the spec leaves unresolved).
pub async fn remediate_flags_bulk<P, H, C>(
    State(state): State<Arc<AppState<P, H, C>>>,
    Json(body): Json<BulkRemediationRequest>,
) -> Result<StatusCode, ServerError>
where
    P: ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    for item in body.items {
        match item.target_service {
            Some(service) => {
                state.flags.set_service_override(service, item.flag_name, item.value, body.reason.clone(), "remediation-workflow", body.problem_id.clone())?;
            }
            None => {
                state.flags.set_global(item.flag_name, item.value, body.reason.clone(), "remediation-workflow", body.problem_id.clone())?;
            }
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
