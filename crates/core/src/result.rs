// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journey execution results (spec.md §3 "JourneyRunResult", "StepResult",
//! §4.5 "Journey Orchestrator").

use serde::{Deserialize, Serialize};

use crate::service::ServiceName;
use crate::{CorrelationId, JourneyId};

/// Outcome of one orchestrated step (spec.md §4.5 "per-step outcome").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResultStatus {
    Completed,
    Failed,
    /// The step's service never became healthy in time, or an earlier step
    /// in a chained journey failed and downstream steps are skipped.
    Skipped,
}

crate::simple_display! {
    StepResultStatus {
        Completed => "completed",
        Failed => "failed",
        Skipped => "skipped",
    }
}

/// Per-step outcome recorded by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step_name: String,
    pub service_name: ServiceName,
    pub status: StepResultStatus,
    pub http_status: Option<u16>,
    pub processing_time_ms: u64,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
    pub correlation_id: CorrelationId,
}

/// Overall outcome of a journey run (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStatus {
    /// Every step completed.
    Completed,
    /// At least one step completed and at least one failed (non-chained mode).
    Partial,
    /// Chained mode: a step failed and all downstream steps were skipped.
    Failed,
}

crate::simple_display! {
    JourneyStatus {
        Completed => "completed",
        Partial => "partial",
        Failed => "failed",
    }
}

/// The full record of one journey run, returned by `POST /api/journey`
/// (spec.md §4.5, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyRunResult {
    pub journey_id: JourneyId,
    pub correlation_id: CorrelationId,
    pub status: JourneyStatus,
    pub steps: Vec<StepResult>,
    pub started_at_ms: u64,
    pub ended_at_ms: u64,
}

impl JourneyRunResult {
    /// Derive the overall [`JourneyStatus`] from per-step outcomes, per
    /// spec.md §4.5: all completed -> `Completed`; any failure in chained
    /// mode (signaled by a trailing run of `Skipped` steps after the first
    /// failure) -> `Failed`; any failure otherwise -> `Partial`.
    pub fn derive_status(steps: &[StepResult], chained: bool) -> JourneyStatus {
        let any_failed = steps.iter().any(|s| s.status == StepResultStatus::Failed);
        if !any_failed {
            return JourneyStatus::Completed;
        }
        if chained {
            JourneyStatus::Failed
        } else {
            JourneyStatus::Partial
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
