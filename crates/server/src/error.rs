// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps [`EngineError`]/[`FlagValidationError`]/[`ConfigError`] onto the
//! `{success:false, error, details?}` envelope and HTTP status every
//! operational error returns (spec.md §7 "Propagation policy").
//!
//! Journey failures are never represented this way — a journey that ran but
//! had failing steps is a 2xx with per-step detail, handled entirely in
//! `routes::journey`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use bos_core::FlagValidationError;
use bos_engine::EngineError;
use bos_wire::ApiError;

pub struct ServerError {
    status: StatusCode,
    body: ApiError,
}

impl ServerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: ApiError::new(message) }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(err: EngineError) -> Self {
        let status = match &err {
            EngineError::PortExhausted | EngineError::ChildHealthTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::PortBindFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::ChildCrashed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::StepTransportError { .. } | EngineError::StepErrorResponse { .. } => StatusCode::BAD_GATEWAY,
            EngineError::FlagValidation(_) => StatusCode::BAD_REQUEST,
            EngineError::PersistenceWriteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::EventDeliveryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::UnknownFlag(_) | EngineError::UnknownService(_) => StatusCode::NOT_FOUND,
        };
        Self::new(status, err.api_message())
    }
}

impl From<FlagValidationError> for ServerError {
    fn from(err: FlagValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<bos_runbook::ConfigError> for ServerError {
    fn from(err: bos_runbook::ConfigError) -> Self {
        let status = match &err {
            bos_runbook::ConfigError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}
