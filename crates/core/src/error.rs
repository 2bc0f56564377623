// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy (spec.md §7) used across crate boundaries.
//!
//! Each crate that owns a component defines its own richer error enum
//! (`PortError` in bos-engine, `SnapshotError` in bos-storage, ...); this
//! module holds only the small set of error kinds that cross those
//! boundaries as-is, e.g. into HTTP response bodies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of chaos-injected error kinds a child service can return
/// from `/process` (spec.md §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaosErrorKind {
    Timeout,
    ServiceUnavailable,
    InternalError,
    ValidationFailed,
}

impl ChaosErrorKind {
    /// The HTTP status code this error kind maps to.
    pub fn http_status(self) -> u16 {
        match self {
            ChaosErrorKind::Timeout => 408,
            ChaosErrorKind::ServiceUnavailable => 503,
            ChaosErrorKind::InternalError => 500,
            ChaosErrorKind::ValidationFailed => 400,
        }
    }
}

crate::simple_display! {
    ChaosErrorKind {
        Timeout => "timeout",
        ServiceUnavailable => "service_unavailable",
        InternalError => "internal_error",
        ValidationFailed => "validation_failed",
    }
}

/// Errors general enough to be shared verbatim by more than one crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("invalid flag value for {flag}: {reason}")]
    InvalidFlagValue { flag: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_matches_spec_table() {
        assert_eq!(ChaosErrorKind::Timeout.http_status(), 408);
        assert_eq!(ChaosErrorKind::ServiceUnavailable.http_status(), 503);
        assert_eq!(ChaosErrorKind::InternalError.http_status(), 500);
        assert_eq!(ChaosErrorKind::ValidationFailed.http_status(), 400);
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(ChaosErrorKind::Timeout.to_string(), "timeout");
        assert_eq!(ChaosErrorKind::ServiceUnavailable.to_string(), "service_unavailable");
    }
}
