// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::flags::{FlagSet, FlagState};
use crate::journey::{JourneySpec, StepSpec, SubstepSpec};
use crate::service::{CompanyContext, ServiceName, ServiceRecord, ServiceState};

/// Proptest strategies for core state machine and flag-value types.
pub mod strategies {
    use crate::flags::FlagValue;
    use crate::service::ServiceState;
    use proptest::prelude::*;

    pub fn arb_service_state() -> impl Strategy<Value = ServiceState> {
        prop_oneof![
            Just(ServiceState::Starting),
            Just(ServiceState::Healthy),
            Just(ServiceState::Unhealthy),
            Just(ServiceState::Stopping),
        ]
    }

    pub fn arb_unit_interval_flag_value() -> impl Strategy<Value = FlagValue> {
        (0.0..=1.0f64).prop_map(FlagValue::Real)
    }
}

/// A three-step journey (`Browse -> Checkout -> Payment`) for a fictitious
/// company, suitable as a default fixture in engine/server/CLI tests.
pub fn sample_journey(company_name: &str) -> JourneySpec {
    let steps = vec![
        StepSpec::new(0, "Browse", company_name, "navigation", 200)
            .with_substeps(vec![SubstepSpec { substep_name: "load_catalog".into(), duration_ms: 80 }]),
        StepSpec::new(1, "Checkout", company_name, "commerce", 350).with_substeps(vec![
            SubstepSpec { substep_name: "validate_cart".into(), duration_ms: 60 },
            SubstepSpec { substep_name: "apply_discounts".into(), duration_ms: 40 },
        ]),
        StepSpec::new(2, "Payment", company_name, "commerce", 500)
            .with_substeps(vec![SubstepSpec { substep_name: "charge_card".into(), duration_ms: 300 }]),
    ];
    JourneySpec::new(company_name, "retail", "ecommerce").with_steps(steps)
}

/// A healthy [`ServiceRecord`] for `service_name`, started at `start_time_ms`.
pub fn healthy_service_record(service_name: &str, port: u16, start_time_ms: u64) -> ServiceRecord {
    ServiceRecord {
        service_name: ServiceName::from(service_name),
        pid: 1,
        port,
        start_time_ms,
        last_healthy_at_ms: Some(start_time_ms),
        company_context: CompanyContext {
            company_name: "Acme".into(),
            domain: "retail".into(),
            industry_type: "ecommerce".into(),
        },
        journey_type: "checkout".into(),
        state: ServiceState::Healthy,
    }
}

/// An empty [`FlagSet`] (no keys set), for tests exercising override-merge
/// behavior without depending on the full default schema.
pub fn empty_flag_set() -> FlagSet {
    FlagSet::new()
}

/// A [`FlagState`] with defaults and no overrides, timestamped at `now_ms`.
pub fn default_flag_state(now_ms: u64) -> FlagState {
    FlagState::new(now_ms)
}
