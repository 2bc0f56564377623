// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn parse_round_trips_every_wire_name() {
    for name in FlagName::ALL {
        assert_eq!(FlagName::parse(name.as_wire_str()), Some(name));
    }
}

#[test]
fn parse_rejects_unknown_name() {
    assert_eq!(FlagName::parse("not_a_flag"), None);
}

#[test]
fn default_global_flags_has_every_name() {
    let defaults = default_global_flags();
    assert_eq!(defaults.len(), FlagName::ALL.len());
    for name in FlagName::ALL {
        assert!(defaults.contains_key(&name));
    }
}

#[test]
fn validate_accepts_unit_interval_within_range() {
    let v = validate(FlagName::ErrorsPerTransaction, FlagValue::Real(0.5)).unwrap();
    assert_eq!(v, FlagValue::Real(0.5));
}

#[test]
fn validate_rejects_unit_interval_out_of_range() {
    let err = validate(FlagName::ErrorsPerVisit, FlagValue::Real(1.5)).unwrap_err();
    assert!(matches!(err, FlagValidationError::OutOfUnitInterval { .. }));
}

#[test]
fn validate_rejects_negative_errors_per_minute() {
    let err = validate(FlagName::ErrorsPerMinute, FlagValue::Real(-1.0)).unwrap_err();
    assert!(matches!(err, FlagValidationError::Negative { .. }));
}

#[test]
fn validate_accepts_non_negative_errors_per_minute() {
    let v = validate(FlagName::ErrorsPerMinute, FlagValue::Real(3.0)).unwrap();
    assert_eq!(v, FlagValue::Real(3.0));
}

#[test]
fn validate_rejects_non_positive_regenerate_count() {
    let err = validate(FlagName::RegenerateEveryNTransactions, FlagValue::Int(0)).unwrap_err();
    assert!(matches!(err, FlagValidationError::NotPositive { .. }));
}

#[test]
fn validate_accepts_positive_regenerate_count() {
    let v = validate(FlagName::RegenerateEveryNTransactions, FlagValue::Int(50)).unwrap();
    assert_eq!(v, FlagValue::Int(50));
}

#[test]
fn validate_rejects_type_mismatch_on_bool_flag() {
    let err = validate(FlagName::CacheEnabled, FlagValue::Real(1.0)).unwrap_err();
    assert!(matches!(err, FlagValidationError::TypeMismatch { .. }));
}

#[test]
fn flag_state_effective_falls_back_to_global() {
    let state = FlagState::new(1_000);
    let service = ServiceName::from("CheckoutService-acme");
    let effective = state.effective(&service);
    assert_eq!(effective.get(&FlagName::CacheEnabled), Some(&FlagValue::Bool(true)));
}

#[test]
fn flag_state_override_wins_over_global() {
    let mut state = FlagState::new(1_000);
    let service = ServiceName::from("CheckoutService-acme");
    let mut override_set = FlagSet::new();
    override_set.insert(FlagName::ErrorsPerTransaction, FlagValue::Real(0.25));
    state.overrides.insert(service.clone(), override_set);

    let effective = state.effective(&service);
    assert_eq!(effective.get(&FlagName::ErrorsPerTransaction), Some(&FlagValue::Real(0.25)));
    // Unrelated keys still come from global.
    assert_eq!(effective.get(&FlagName::CacheEnabled), Some(&FlagValue::Bool(true)));
}

#[test]
fn flag_state_override_does_not_leak_to_other_services() {
    let mut state = FlagState::new(1_000);
    let acme = ServiceName::from("CheckoutService-acme");
    let globex = ServiceName::from("CheckoutService-globex");
    let mut override_set = FlagSet::new();
    override_set.insert(FlagName::ErrorInjectionEnabled, FlagValue::Bool(false));
    state.overrides.insert(acme.clone(), override_set);

    assert_eq!(
        state.effective(&globex).get(&FlagName::ErrorInjectionEnabled),
        Some(&FlagValue::Bool(true))
    );
}

#[test]
fn flag_state_round_trips_camel_case_json() {
    let state = FlagState::new(5_000);
    let json = serde_json::to_value(&state).expect("serialize");
    assert_eq!(json["updatedAtMs"], 5000);
    assert!(json["global"]["errors_per_minute"].is_number());
}
