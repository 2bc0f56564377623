// SPDX-License-Identifier: MIT

use super::*;

fn step(status: StepResultStatus) -> StepResult {
    StepResult {
        step_name: "Checkout".into(),
        service_name: ServiceName::from("CheckoutService-acme"),
        status,
        http_status: Some(200),
        processing_time_ms: 120,
        error_type: None,
        error_message: None,
        correlation_id: CorrelationId::new(),
    }
}

#[test]
fn derive_status_all_completed() {
    let steps = vec![step(StepResultStatus::Completed), step(StepResultStatus::Completed)];
    assert_eq!(JourneyRunResult::derive_status(&steps, false), JourneyStatus::Completed);
    assert_eq!(JourneyRunResult::derive_status(&steps, true), JourneyStatus::Completed);
}

#[test]
fn derive_status_partial_when_not_chained() {
    let steps = vec![step(StepResultStatus::Completed), step(StepResultStatus::Failed)];
    assert_eq!(JourneyRunResult::derive_status(&steps, false), JourneyStatus::Partial);
}

#[test]
fn derive_status_failed_when_chained() {
    let steps = vec![
        step(StepResultStatus::Completed),
        step(StepResultStatus::Failed),
        step(StepResultStatus::Skipped),
    ];
    assert_eq!(JourneyRunResult::derive_status(&steps, true), JourneyStatus::Failed);
}

#[test]
fn journey_run_result_round_trips_camel_case_json() {
    let result = JourneyRunResult {
        journey_id: JourneyId::new(),
        correlation_id: CorrelationId::new(),
        status: JourneyStatus::Completed,
        steps: vec![step(StepResultStatus::Completed)],
        started_at_ms: 1_000,
        ended_at_ms: 1_500,
    };
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(json["startedAtMs"], 1000);
    assert_eq!(json["endedAtMs"], 1500);
    assert_eq!(json["steps"][0]["serviceName"], "CheckoutService-acme");
}
