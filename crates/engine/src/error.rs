// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-wide error taxonomy (spec.md §7 "Error Handling").

use bos_core::FlagValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no free port in the configured range")]
    PortExhausted,
    #[error("failed to bind port {port}: {source}")]
    PortBindFailed { port: u16, source: std::io::Error },
    #[error("service {service_name} did not become healthy within the timeout")]
    ChildHealthTimeout { service_name: String },
    #[error("service {service_name} exited unexpectedly (pid {pid})")]
    ChildCrashed { service_name: String, pid: u32 },
    #[error("transport error calling {service_name}: {message}")]
    StepTransportError { service_name: String, message: String },
    #[error("step {step_name} on {service_name} returned an error response: {status}")]
    StepErrorResponse { step_name: String, service_name: String, status: u16 },
    #[error(transparent)]
    FlagValidation(#[from] FlagValidationError),
    #[error("failed to persist state: {0}")]
    PersistenceWriteFailed(String),
    #[error("failed to enqueue event for delivery: {0}")]
    EventDeliveryFailed(String),
    #[error("unknown feature flag: {0}")]
    UnknownFlag(String),
    #[error("unknown service: {0}")]
    UnknownService(String),
}

impl EngineError {
    /// The `{success: false, error, details?}` shape spec.md §7 mandates for
    /// operational errors returned over the public API.
    pub fn api_message(&self) -> String {
        self.to_string()
    }
}
