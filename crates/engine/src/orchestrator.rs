// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journey Orchestrator (spec.md §4.5): drives one customer journey through
//! its steps' `/process` endpoints, propagating correlation/tracing headers
//! (via [`bos_wire::headers::build_propagated_headers`]) and turning every
//! step outcome into a [`BusinessEvent`] for the fan-out.
//!
//! The Event Fan-out is injected here (and into the Flag Store / Supervisor),
//! not into the Child Service Runtime — children never talk to the
//! observability sink directly, the orchestrator does it on their behalf
//! after calling them (spec.md §9 design note).
//!
//! Chained mode only ever invokes the journey's first step; every downstream
//! step is recorded `Skipped` without a network call. This mirrors a known
//! limitation carried over from spec.md §4.5's own description of chained
//! mode rather than a gap introduced here.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bos_adapters::{HttpClient, HttpMethod, HttpRequest};
use bos_core::{
    BusinessEvent, BusinessEventType, Clock, CorrelationId, JourneyRunResult, JourneySpec, ServiceName, StepResult, StepResultStatus, SystemClock,
};
use bos_wire::{ProcessRequest, ProcessResponse};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::EngineError;
use crate::fanout::EventSink;
use crate::supervisor::ServiceSupervisor;

/// Options controlling one simulation run (spec.md §4.5
/// `SimulateJourney(journeySpec, {chained, thinkTimeMs,
/// errorSimulationEnabled})`).
///
/// `error_simulation_enabled`, when set, is forwarded to each child as an
/// additional request field rather than consulted here — fault injection
/// itself is entirely the Child Service Runtime's responsibility
/// (spec.md §4.3).
#[derive(Debug, Clone, Default)]
pub struct SimulationOptions {
    pub chained: bool,
    pub think_time_ms: Option<u64>,
    pub error_simulation_enabled: Option<bool>,
}

pub struct JourneyOrchestrator<P, H, C = SystemClock>
where
    P: bos_adapters::ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    supervisor: Arc<ServiceSupervisor<P, H, C>>,
    http: Arc<H>,
    sink: Arc<dyn EventSink>,
    clock: C,
    /// Shared with the Auto-Load Generator (spec.md §4.6) so a burst
    /// multi-customer call and continuous auto-load traffic can never
    /// together exceed one global concurrency bound.
    concurrency: Arc<Semaphore>,
}

impl<P, H, C> Clone for JourneyOrchestrator<P, H, C>
where
    P: bos_adapters::ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    fn clone(&self) -> Self {
        Self {
            supervisor: self.supervisor.clone(),
            http: self.http.clone(),
            sink: self.sink.clone(),
            clock: self.clock.clone(),
            concurrency: self.concurrency.clone(),
        }
    }
}

impl<P, H, C> JourneyOrchestrator<P, H, C>
where
    P: bos_adapters::ProcessAdapter,
    H: HttpClient,
    C: Clock + 'static,
{
    pub fn new(supervisor: Arc<ServiceSupervisor<P, H, C>>, http: Arc<H>, sink: Arc<dyn EventSink>, clock: C, concurrency: Arc<Semaphore>) -> Self {
        Self { supervisor, http, sink, clock, concurrency }
    }

    /// Run one customer journey (spec.md §4.5 "SimulateJourney").
    ///
    /// Always tears down the company's previous services before starting a
    /// fresh run (the "cleanup-before-start invariant"): a new journey
    /// submission must never observe state left behind by a prior run for
    /// the same company.
    pub async fn simulate_journey(&self, journey: &JourneySpec, options: &SimulationOptions, inbound_headers: &BTreeMap<String, String>) -> Result<JourneyRunResult, EngineError> {
        self.supervisor.stop_customer_journey_services(&journey.company_name).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.supervisor.ensure_journey(journey).await?;

        let correlation_id = CorrelationId::new();
        self.run_steps(journey, options, correlation_id, inbound_headers).await
    }

    /// Run `customer_count` journeys against the same, already-torn-down and
    /// re-ensured set of services, concurrently up to the shared
    /// `maxConcurrent` bound (spec.md §4.5 SUPPLEMENT).
    ///
    /// Cleanup and service startup happen exactly once for the whole batch:
    /// these customers share one journey's services, unlike independent
    /// `simulate_journey` calls which each tear down and restart them.
    pub async fn simulate_multiple_customers(
        &self,
        journey: &JourneySpec,
        customer_count: u32,
        options: &SimulationOptions,
        inbound_headers: &BTreeMap<String, String>,
    ) -> Vec<Result<JourneyRunResult, EngineError>> {
        self.supervisor.stop_customer_journey_services(&journey.company_name).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        if let Err(err) = self.supervisor.ensure_journey(journey).await {
            let message = err.to_string();
            return (0..customer_count)
                .map(|_| Err(EngineError::StepTransportError { service_name: journey.company_name.clone(), message: message.clone() }))
                .collect();
        }

        let mut set = JoinSet::new();
        for _ in 0..customer_count {
            let orchestrator = self.clone();
            let journey = journey.clone();
            let options = options.clone();
            let inbound_headers = inbound_headers.clone();
            let permit = self.concurrency.clone();
            set.spawn(async move {
                let _permit = match permit.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return Err(EngineError::StepTransportError { service_name: journey.company_name.clone(), message: "concurrency limiter closed".into() }),
                };
                let correlation_id = CorrelationId::new();
                orchestrator.run_steps(&journey, &options, correlation_id, &inbound_headers).await
            });
        }

        let mut results = Vec::with_capacity(customer_count as usize);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(join_err) => results.push(Err(EngineError::StepTransportError { service_name: "unknown".into(), message: join_err.to_string() })),
            }
        }
        results
    }

    /// Invoke every step's `/process` endpoint for one correlation id,
    /// assuming the journey's services are already running.
    ///
    /// `pub(crate)` rather than private: the Auto-Load Generator (spec.md
    /// §4.6) calls this directly for companies it already knows are active,
    /// bypassing the cleanup-before-start invariant that only applies to a
    /// fresh customer-facing journey submission.
    pub(crate) async fn run_steps(
        &self,
        journey: &JourneySpec,
        options: &SimulationOptions,
        correlation_id: CorrelationId,
        inbound_headers: &BTreeMap<String, String>,
    ) -> Result<JourneyRunResult, EngineError> {
        let started_at_ms = self.clock.epoch_ms();
        let mut results = Vec::with_capacity(journey.steps.len());

        for (index, step) in journey.steps.iter().enumerate() {
            if options.chained && index > 0 {
                results.push(StepResult {
                    step_name: step.step_name.clone(),
                    service_name: ServiceName::from(step.service_name.as_str()),
                    status: StepResultStatus::Skipped,
                    http_status: None,
                    processing_time_ms: 0,
                    error_type: None,
                    error_message: None,
                    correlation_id: correlation_id.clone(),
                });
                continue;
            }

            let record = self
                .supervisor
                .inventory()
                .into_iter()
                .find(|r| r.service_name.as_str() == step.service_name)
                .ok_or_else(|| EngineError::UnknownService(step.service_name.clone()))?;

            let step_result = self.invoke_step(step, journey, &correlation_id, record.port, inbound_headers).await;
            let business_event = self.business_event_for(&step_result, journey, &correlation_id);
            self.sink.emit_business(business_event);
            results.push(step_result);

            if let Some(think_time_ms) = options.think_time_ms {
                if think_time_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(think_time_ms)).await;
                }
            }
        }

        let ended_at_ms = self.clock.epoch_ms();
        let status = JourneyRunResult::derive_status(&results, options.chained);
        Ok(JourneyRunResult { journey_id: journey.journey_id, correlation_id, status, steps: results, started_at_ms, ended_at_ms })
    }

    async fn invoke_step(
        &self,
        step: &bos_core::StepSpec,
        journey: &JourneySpec,
        correlation_id: &CorrelationId,
        port: u16,
        inbound_headers: &BTreeMap<String, String>,
    ) -> StepResult {
        let service_name = ServiceName::from(step.service_name.as_str());
        let request_body = ProcessRequest {
            correlation_id: correlation_id.clone(),
            journey_id: journey.journey_id.clone(),
            step_name: step.step_name.clone(),
            substeps: step.substeps.clone(),
            customer_profile: journey.customer_profile.clone(),
            additional_fields: Default::default(),
        };

        let headers = bos_wire::headers::build_propagated_headers(&correlation_id.to_string(), inbound_headers);

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("http://127.0.0.1:{port}/process"),
            headers,
            body: Some(serde_json::to_value(&request_body).unwrap_or(serde_json::Value::Null)),
            timeout: Duration::from_secs(30),
        };

        match self.http.send(request).await {
            Ok(response) => match serde_json::from_value::<ProcessResponse>(response.body.clone()) {
                Ok(parsed) => StepResult {
                    step_name: step.step_name.clone(),
                    service_name,
                    status: if parsed.error_type.is_some() { StepResultStatus::Failed } else { StepResultStatus::Completed },
                    http_status: Some(parsed.http_status),
                    processing_time_ms: parsed.processing_time_ms,
                    error_type: parsed.error_type,
                    error_message: parsed.error_message,
                    correlation_id: correlation_id.clone(),
                },
                Err(err) => StepResult {
                    step_name: step.step_name.clone(),
                    service_name,
                    status: StepResultStatus::Failed,
                    http_status: Some(response.status),
                    processing_time_ms: 0,
                    error_type: Some("invalid_response".into()),
                    error_message: Some(err.to_string()),
                    correlation_id: correlation_id.clone(),
                },
            },
            Err(bos_adapters::HttpError::Status { status, body }) => StepResult {
                step_name: step.step_name.clone(),
                service_name,
                status: StepResultStatus::Failed,
                http_status: Some(status),
                processing_time_ms: 0,
                error_type: Some("http_error".into()),
                error_message: body.as_str().map(str::to_string).or_else(|| Some(body.to_string())),
                correlation_id: correlation_id.clone(),
            },
            Err(err) => StepResult {
                step_name: step.step_name.clone(),
                service_name,
                status: StepResultStatus::Failed,
                http_status: None,
                processing_time_ms: 0,
                error_type: Some("transport_error".into()),
                error_message: Some(err.to_string()),
                correlation_id: correlation_id.clone(),
            },
        }
    }

    fn business_event_for(&self, result: &StepResult, journey: &JourneySpec, correlation_id: &CorrelationId) -> BusinessEvent {
        BusinessEvent {
            event_type: BusinessEventType::Biz,
            correlation_id: correlation_id.clone(),
            journey_id: journey.journey_id.clone(),
            step_name: result.step_name.clone(),
            service_name: result.service_name.clone(),
            company_name: journey.company_name.clone(),
            status: result.status.to_string(),
            processing_time_ms: result.processing_time_ms,
            additional_fields: Default::default(),
            timestamp_ms: self.clock.epoch_ms(),
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
