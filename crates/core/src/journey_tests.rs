// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn derive_service_name_sanitizes_company() {
    assert_eq!(derive_service_name("Checkout", "Acme, Inc."), "CheckoutService-acme-inc");
}

#[test]
fn derive_service_name_collapses_runs_of_separators() {
    assert_eq!(derive_service_name("Login", "A & B   Co."), "LoginService-a-b-co");
}

#[test]
fn derive_service_name_trims_trailing_separators() {
    assert_eq!(derive_service_name("Pay", "Acme!!!"), "PayService-acme");
}

#[test]
fn step_spec_new_derives_service_name() {
    let step = StepSpec::new(0, "Checkout", "Acme", "payment", 500);
    assert_eq!(step.service_name, "CheckoutService-acme");
    assert_eq!(step.step_index, 0);
    assert!(step.substeps.is_empty());
}

#[test]
fn journey_spec_service_names_preserves_order_and_duplicates() {
    let journey = JourneySpec::new("Acme", "retail", "ecommerce").with_steps(vec![
        StepSpec::new(0, "Login", "Acme", "auth", 100),
        StepSpec::new(1, "Browse", "Acme", "catalog", 200),
        StepSpec::new(2, "Login", "Acme", "auth", 100),
    ]);
    let names: Vec<&str> = journey.service_names().collect();
    assert_eq!(names, vec!["LoginService-acme", "BrowseService-acme", "LoginService-acme"]);
}

#[test]
fn journey_spec_round_trips_additional_fields() {
    let json = serde_json::json!({
        "companyName": "Acme",
        "domain": "retail",
        "industryType": "ecommerce",
        "steps": [],
        "widget": "gizmo"
    });
    let spec: JourneySpec = serde_json::from_value(json).expect("deserialize");
    assert_eq!(spec.additional_fields.get("widget").and_then(|v| v.as_str()), Some("gizmo"));
    assert!(spec.steps.is_empty());
}
