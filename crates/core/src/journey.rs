// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journey/step specification (spec.md §3 "JourneySpec", "StepSpec").
//!
//! A [`JourneySpec`] is immutable once submitted; the orchestrator and
//! supervisor only ever read it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::JourneyId;

/// One customer's profile data, carried through every step payload.
///
/// Kept as a free-form map (spec.md doesn't enumerate fields) so journey
/// authors can attach whatever the child services need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerProfile(pub HashMap<String, Value>);

/// One substep of a [`StepSpec`]: a named sub-operation with a declared
/// duration the child service's `/process` handler accumulates (with
/// jitter) when it simulates work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstepSpec {
    pub substep_name: String,
    pub duration_ms: u64,
}

/// One ordered stage of a journey, backed by one child service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSpec {
    pub step_index: u32,
    pub step_name: String,
    /// Identity key used everywhere downstream; derived by [`StepSpec::new`]
    /// as `<stepName>Service-<companyName-sanitized>` (spec.md §3).
    pub service_name: String,
    pub category: String,
    pub estimated_duration_ms: u64,
    #[serde(default)]
    pub substeps: Vec<SubstepSpec>,
    #[serde(default)]
    pub has_error: bool,
}

impl StepSpec {
    /// Build a step spec, deriving `service_name` from the step name and
    /// company name per spec.md §3.
    pub fn new(
        step_index: u32,
        step_name: impl Into<String>,
        company_name: &str,
        category: impl Into<String>,
        estimated_duration_ms: u64,
    ) -> Self {
        let step_name = step_name.into();
        let service_name = derive_service_name(&step_name, company_name);
        Self {
            step_index,
            step_name,
            service_name,
            category: category.into(),
            estimated_duration_ms,
            substeps: Vec::new(),
            has_error: false,
        }
    }

    pub fn with_substeps(mut self, substeps: Vec<SubstepSpec>) -> Self {
        self.substeps = substeps;
        self
    }
}

/// Derive `serviceName` from a step name and company name: `<stepName>Service-<sanitized>`.
///
/// Sanitization lowercases and keeps only ASCII alphanumerics, replacing every
/// other run of characters with a single `-`, then trims leading/trailing `-`.
/// This keeps the derived name stable and safe to use as a process title,
/// a port-table key, and a URL path segment.
pub fn derive_service_name(step_name: &str, company_name: &str) -> String {
    format!("{step_name}Service-{}", sanitize_company_name(company_name))
}

fn sanitize_company_name(company_name: &str) -> String {
    let mut out = String::with_capacity(company_name.len());
    let mut last_was_sep = false;
    for ch in company_name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep && !out.is_empty() {
            out.push('-');
            last_was_sep = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// An ordered sequence of steps describing a synthetic customer interaction.
///
/// Immutable once submitted (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySpec {
    #[serde(default = "JourneyId::new")]
    pub journey_id: JourneyId,
    pub company_name: String,
    pub domain: String,
    pub industry_type: String,
    pub steps: Vec<StepSpec>,
    #[serde(default)]
    pub customer_profile: CustomerProfile,
    #[serde(flatten)]
    pub additional_fields: HashMap<String, Value>,
}

impl JourneySpec {
    pub fn new(company_name: impl Into<String>, domain: impl Into<String>, industry_type: impl Into<String>) -> Self {
        Self {
            journey_id: JourneyId::new(),
            company_name: company_name.into(),
            domain: domain.into(),
            industry_type: industry_type.into(),
            steps: Vec::new(),
            customer_profile: CustomerProfile::default(),
            additional_fields: HashMap::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<StepSpec>) -> Self {
        self.steps = steps;
        self
    }

    /// `serviceName`s of every step, in declared order (duplicates preserved —
    /// a journey may legitimately revisit the same service twice).
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.service_name.as_str())
    }
}

#[cfg(test)]
#[path = "journey_tests.rs"]
mod tests;
