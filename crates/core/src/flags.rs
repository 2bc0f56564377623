// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feature-flag / chaos-policy data model (spec.md §3 "FlagSet", "FlagState").
//!
//! This module owns the *schema* (recognized flag names, their value kinds,
//! and validation rules) and the plain data containers. The Flag
//! Store's mutation operations, persistence, and change notification live in
//! `bos-engine::flags` — this module just defines what a valid flag state
//! looks like.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::service::ServiceName;

/// Every flag name the Flag Store recognizes (spec.md §3 "FlagSet").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagName {
    ErrorsPerTransaction,
    ErrorsPerVisit,
    ErrorsPerMinute,
    SlowResponsesEnabled,
    CircuitBreakerEnabled,
    CacheEnabled,
    ErrorInjectionEnabled,
    RegenerateEveryNTransactions,
}

impl FlagName {
    pub const ALL: [FlagName; 8] = [
        FlagName::ErrorsPerTransaction,
        FlagName::ErrorsPerVisit,
        FlagName::ErrorsPerMinute,
        FlagName::SlowResponsesEnabled,
        FlagName::CircuitBreakerEnabled,
        FlagName::CacheEnabled,
        FlagName::ErrorInjectionEnabled,
        FlagName::RegenerateEveryNTransactions,
    ];

    /// Parse the wire name (as used in URL paths and JSON keys), e.g.
    /// `"errors_per_transaction"`.
    pub fn parse(wire_name: &str) -> Option<FlagName> {
        FlagName::ALL.into_iter().find(|f| f.as_wire_str() == wire_name)
    }

    pub fn as_wire_str(self) -> &'static str {
        match self {
            FlagName::ErrorsPerTransaction => "errors_per_transaction",
            FlagName::ErrorsPerVisit => "errors_per_visit",
            FlagName::ErrorsPerMinute => "errors_per_minute",
            FlagName::SlowResponsesEnabled => "slow_responses_enabled",
            FlagName::CircuitBreakerEnabled => "circuit_breaker_enabled",
            FlagName::CacheEnabled => "cache_enabled",
            FlagName::ErrorInjectionEnabled => "error_injection_enabled",
            FlagName::RegenerateEveryNTransactions => "regenerate_every_n_transactions",
        }
    }

    pub fn kind(self) -> FlagKind {
        match self {
            FlagName::ErrorsPerTransaction | FlagName::ErrorsPerVisit => FlagKind::UnitInterval,
            FlagName::ErrorsPerMinute => FlagKind::NonNegativeReal,
            FlagName::SlowResponsesEnabled
            | FlagName::CircuitBreakerEnabled
            | FlagName::CacheEnabled
            | FlagName::ErrorInjectionEnabled => FlagKind::Bool,
            FlagName::RegenerateEveryNTransactions => FlagKind::PositiveInt,
        }
    }

    pub fn default_value(self) -> FlagValue {
        match self {
            FlagName::ErrorsPerTransaction => FlagValue::Real(0.0),
            FlagName::ErrorsPerVisit => FlagValue::Real(0.0),
            FlagName::ErrorsPerMinute => FlagValue::Real(0.0),
            FlagName::SlowResponsesEnabled => FlagValue::Bool(false),
            FlagName::CircuitBreakerEnabled => FlagValue::Bool(false),
            FlagName::CacheEnabled => FlagValue::Bool(true),
            FlagName::ErrorInjectionEnabled => FlagValue::Bool(true),
            FlagName::RegenerateEveryNTransactions => FlagValue::Int(100),
        }
    }

    /// A human-readable descriptor (used by `GET /api/feature_flag/:name` and
    /// the CLI's flag help text).
    pub fn describe(self) -> FlagDescriptor {
        FlagDescriptor { name: self, kind: self.kind(), default: self.default_value() }
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// The value-domain rule a [`FlagName`] is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    /// Real in `[0, 1]` — a probability.
    UnitInterval,
    /// Real `>= 0`.
    NonNegativeReal,
    /// Integer `>= 1`.
    PositiveInt,
}

/// A flag's value. Numeric flags are always carried as `f64` on the wire
/// (matching spec.md's "real" domain) except `regenerate_every_n_transactions`,
/// which is an integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Real(f64),
    Int(i64),
}

impl FlagValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            FlagValue::Real(r) => Some(r),
            FlagValue::Int(i) => Some(i as f64),
            FlagValue::Bool(_) => None,
        }
    }
}

/// Descriptor returned by `GET /api/feature_flag/:name` and used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDescriptor {
    pub name: FlagName,
    #[serde(skip)]
    pub kind: FlagKind,
    pub default: FlagValue,
}

/// Errors produced validating a proposed flag mutation (spec.md §4.2
/// "Validation", §7 "FlagValidation").
#[derive(Debug, Error, PartialEq)]
pub enum FlagValidationError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("flag {flag} expects a {expected} value")]
    TypeMismatch { flag: FlagName, expected: &'static str },
    #[error("flag {flag} must be in [0, 1], got {value}")]
    OutOfUnitInterval { flag: FlagName, value: f64 },
    #[error("flag {flag} must be >= 0, got {value}")]
    Negative { flag: FlagName, value: f64 },
    #[error("flag {flag} must be a positive integer, got {value}")]
    NotPositive { flag: FlagName, value: i64 },
}

/// Validate a proposed value against `name`'s schema, rejecting any
/// out-of-range input rather than silently clamping it — a unit-interval
/// rate outside `[0, 1]` is rejected with `OutOfUnitInterval`, a negative
/// real is rejected with `Negative`, and a non-positive
/// `regenerate_every_n_transactions` is rejected with `NotPositive`
/// (spec.md §4.2: "reject non-positive regenerate_every_n_transactions").
pub fn validate(name: FlagName, value: FlagValue) -> Result<FlagValue, FlagValidationError> {
    match name.kind() {
        FlagKind::Bool => value
            .as_bool()
            .map(FlagValue::Bool)
            .ok_or(FlagValidationError::TypeMismatch { flag: name, expected: "boolean" }),
        FlagKind::UnitInterval => {
            let v = value
                .as_f64()
                .ok_or(FlagValidationError::TypeMismatch { flag: name, expected: "number" })?;
            if !(0.0..=1.0).contains(&v) {
                return Err(FlagValidationError::OutOfUnitInterval { flag: name, value: v });
            }
            Ok(FlagValue::Real(v))
        }
        FlagKind::NonNegativeReal => {
            let v = value
                .as_f64()
                .ok_or(FlagValidationError::TypeMismatch { flag: name, expected: "number" })?;
            if v < 0.0 {
                return Err(FlagValidationError::Negative { flag: name, value: v });
            }
            Ok(FlagValue::Real(v))
        }
        FlagKind::PositiveInt => {
            let v = match value {
                FlagValue::Int(i) => i,
                FlagValue::Real(r) => r as i64,
                FlagValue::Bool(_) => {
                    return Err(FlagValidationError::TypeMismatch { flag: name, expected: "integer" })
                }
            };
            if v < 1 {
                return Err(FlagValidationError::NotPositive { flag: name, value: v });
            }
            Ok(FlagValue::Int(v))
        }
    }
}

/// A (possibly partial) mapping from flag name to value. The global flag set
/// is always complete (every [`FlagName`] present); a per-service override
/// set may carry any subset of keys.
pub type FlagSet = BTreeMap<FlagName, FlagValue>;

/// Build the complete default global [`FlagSet`].
pub fn default_global_flags() -> FlagSet {
    FlagName::ALL.into_iter().map(|name| (name, name.default_value())).collect()
}

/// The Flag Store's full persisted state: the complete global set plus a
/// per-service partial override map (spec.md §3 "FlagState").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagState {
    pub global: FlagSet,
    pub overrides: BTreeMap<ServiceName, FlagSet>,
    pub updated_at_ms: u64,
}

impl FlagState {
    pub fn new(updated_at_ms: u64) -> Self {
        Self { global: default_global_flags(), overrides: BTreeMap::new(), updated_at_ms }
    }

    /// Effective flag set for `service`: `global ⨁ overrides[service]`,
    /// override winning per key (spec.md §3).
    pub fn effective(&self, service: &ServiceName) -> FlagSet {
        let mut effective = self.global.clone();
        if let Some(overrides) = self.overrides.get(service) {
            for (name, value) in overrides {
                effective.insert(*name, *value);
            }
        }
        effective
    }
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
