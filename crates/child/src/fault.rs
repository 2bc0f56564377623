// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `/process` fault-injection decision (spec.md §4.3 step 3).
//!
//! Precedence, short-circuiting on first match (spec.md §9's Open Question,
//! resolved in SPEC_FULL.md):
//!
//! 1. `error_injection_enabled=false` -> success, no latency.
//! 2. sample `u`; `u < errors_per_transaction` -> error.
//! 3. `errors_per_visit` -> error, decided (and memoized) once per
//!    correlation id rather than resampled every call.
//! 4. the `errors_per_minute` fuse -> error, only consulted if neither of
//!    the above already fired.
//! 5. `slow_responses_enabled=true` -> inject latency.
//! 6. success.

use bos_core::{ChaosErrorKind, FlagName, FlagSet, FlagValue};
use rand::Rng;

/// Bounded uniform latency window for injected slow responses
/// (spec.md §4.3 step 3: "uniform 500-3000ms").
pub const SLOW_RESPONSE_MIN_MS: u64 = 500;
pub const SLOW_RESPONSE_MAX_MS: u64 = 3000;

const ERROR_KINDS: [ChaosErrorKind; 4] = [
    ChaosErrorKind::Timeout,
    ChaosErrorKind::ServiceUnavailable,
    ChaosErrorKind::InternalError,
    ChaosErrorKind::ValidationFailed,
];

#[derive(Debug, Clone, PartialEq)]
pub enum FaultOutcome {
    Success,
    SlowResponse { extra_ms: u64 },
    Error { kind: ChaosErrorKind, flag_name: FlagName },
}

fn flag_value(flags: &FlagSet, name: FlagName) -> FlagValue {
    flags.get(&name).copied().unwrap_or_else(|| name.default_value())
}

fn flag_bool(flags: &FlagSet, name: FlagName) -> bool {
    flag_value(flags, name).as_bool().unwrap_or(false)
}

fn flag_rate(flags: &FlagSet, name: FlagName) -> f64 {
    flag_value(flags, name).as_f64().unwrap_or(0.0)
}

fn random_error_kind(rng: &mut impl Rng) -> ChaosErrorKind {
    ERROR_KINDS[rng.gen_range(0..ERROR_KINDS.len())]
}

/// Decide the fault outcome for one `/process` call, given the effective
/// flag set, whether `errors_per_visit` already fired (or not) for this
/// correlation id, and whether the `errors_per_minute` fuse still has
/// budget this minute.
///
/// `visit_error` is `Some(bool)` once a correlation id's visit-level
/// decision has been memoized (see [`crate::visit::VisitCache`]); `None`
/// means this is the first call for that correlation id and the caller
/// still needs to sample and memoize it.
pub fn decide(flags: &FlagSet, rng: &mut impl Rng, visit_error: bool, minute_fuse_fires: impl FnOnce() -> bool) -> FaultOutcome {
    if !flag_bool(flags, FlagName::ErrorInjectionEnabled) {
        return FaultOutcome::Success;
    }

    let per_transaction_rate = flag_rate(flags, FlagName::ErrorsPerTransaction);
    if rng.gen::<f64>() < per_transaction_rate {
        return FaultOutcome::Error { kind: random_error_kind(rng), flag_name: FlagName::ErrorsPerTransaction };
    }

    if visit_error {
        return FaultOutcome::Error { kind: random_error_kind(rng), flag_name: FlagName::ErrorsPerVisit };
    }

    if minute_fuse_fires() {
        return FaultOutcome::Error { kind: random_error_kind(rng), flag_name: FlagName::ErrorsPerMinute };
    }

    if flag_bool(flags, FlagName::SlowResponsesEnabled) {
        let extra_ms = rng.gen_range(SLOW_RESPONSE_MIN_MS..=SLOW_RESPONSE_MAX_MS);
        return FaultOutcome::SlowResponse { extra_ms };
    }

    FaultOutcome::Success
}

#[cfg(test)]
#[path = "fault_tests.rs"]
mod tests;
