// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed HTTP client for the Public API (spec.md §4.8): one method per
//! endpoint, mirroring the request/response shapes `bos-wire` defines.

use bos_core::{FlagName, FlagValue, JourneyRunResult, JourneySpec, ServiceName};
use bos_wire::{
    BulkRemediationRequest, DetailedHealthResponse, FlagGetResponse, FlagListResponse, FlagPutRequest,
    HealthResponse, PortsCleanupResponse, PortsResponse, RemediationItem, RemediationRequest,
    ResetAndRestartResponse, ServicesResponse, ServicesStatusResponse, SimulateJourneyRequest,
    SimulateMultipleRequest, SimulateMultipleResponse, SimulationOptions,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach {url}: {source}")]
    Unreachable { url: String, source: reqwest::Error },
    #[error("server returned {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("could not parse server response: {0}")]
    Decode(#[from] reqwest::Error),
}

/// A thin wrapper over [`reqwest::Client`] pointed at one `bos-server`
/// instance. Every method issues one request and maps non-2xx responses to
/// [`ClientError::Rejected`] using the `{success:false, error}` envelope
/// `bos-server::error::ServerError` always returns.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let url = request.try_clone().and_then(|r| r.build().ok()).map(|r| r.url().to_string()).unwrap_or_default();
        let response = request.send().await.map_err(|source| ClientError::Unreachable { url, source })?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body.get("error").and_then(|v| v.as_str()).unwrap_or("request failed").to_string();
            return Err(ClientError::Rejected { status, message });
        }
        Ok(response)
    }

    async fn send<T: serde::de::DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ClientError> {
        Ok(self.execute(request).await?.json().await?)
    }

    /// Like [`Self::send`] but discards the body — for endpoints that reply
    /// `204 No Content`.
    async fn send_simple(&self, request: reqwest::RequestBuilder) -> Result<(), ClientError> {
        self.execute(request).await?;
        Ok(())
    }

    pub async fn simulate_journey(&self, journey: JourneySpec, options: SimulationOptions) -> Result<JourneyRunResult, ClientError> {
        let body = SimulateJourneyRequest { journey, options };
        self.send(self.http.post(self.url("/api/journey/simulate")).json(&body)).await
    }

    pub async fn simulate_multiple(&self, journey: JourneySpec, customer_count: u32, options: SimulationOptions) -> Result<SimulateMultipleResponse, ClientError> {
        let body = SimulateMultipleRequest { journey, customer_count, options };
        self.send(self.http.post(self.url("/api/journey/simulate-multiple")).json(&body)).await
    }

    pub async fn list_flags(&self, service: Option<&str>) -> Result<FlagListResponse, ClientError> {
        let mut request = self.http.get(self.url("/api/feature_flag"));
        if let Some(service) = service {
            request = request.query(&[("service", service)]);
        }
        self.send(request).await
    }

    pub async fn get_flag(&self, name: FlagName, service: Option<&str>) -> Result<FlagGetResponse, ClientError> {
        let mut request = self.http.get(self.url(&format!("/api/feature_flag/{}", name.as_wire_str())));
        if let Some(service) = service {
            request = request.query(&[("service", service)]);
        }
        self.send(request).await
    }

    pub async fn put_flag(&self, name: FlagName, value: FlagValue, target_service: Option<ServiceName>, reason: Option<String>) -> Result<FlagGetResponse, ClientError> {
        let body = FlagPutRequest { value, target_service, reason, triggered_by: Some("bos-cli".to_string()) };
        self.send(self.http.put(self.url(&format!("/api/feature_flag/{}", name.as_wire_str()))).json(&body)).await
    }

    pub async fn delete_flag(&self, name: FlagName, target_service: Option<&str>) -> Result<(), ClientError> {
        let mut request = self.http.delete(self.url(&format!("/api/feature_flag/{}", name.as_wire_str())));
        if let Some(service) = target_service {
            request = request.query(&[("targetService", service)]);
        }
        self.send_simple(request).await
    }

    pub async fn delete_service_overrides(&self, service: &str) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&format!("/api/feature_flag/service/{service}")));
        self.send_simple(request).await
    }

    pub async fn remediate_flag(&self, flag_name: FlagName, value: FlagValue, target_service: Option<ServiceName>, reason: Option<String>, problem_id: Option<String>) -> Result<FlagGetResponse, ClientError> {
        let body = RemediationRequest { flag_name, value, target_service, reason, problem_id };
        self.send(self.http.post(self.url("/api/remediation/feature-flag")).json(&body)).await
    }

    pub async fn remediate_flags_bulk(&self, items: Vec<RemediationItem>, reason: Option<String>, problem_id: Option<String>) -> Result<(), ClientError> {
        let body = BulkRemediationRequest { items, reason, problem_id };
        self.send_simple(self.http.post(self.url("/api/remediation/feature-flags/bulk")).json(&body)).await
    }

    pub async fn list_services(&self) -> Result<ServicesResponse, ClientError> {
        self.send(self.http.get(self.url("/api/admin/services"))).await
    }

    pub async fn services_status(&self) -> Result<ServicesStatusResponse, ClientError> {
        self.send(self.http.get(self.url("/api/admin/services/status"))).await
    }

    pub async fn reset_and_restart(&self) -> Result<ResetAndRestartResponse, ClientError> {
        self.send(self.http.post(self.url("/api/admin/reset-and-restart"))).await
    }

    pub async fn list_ports(&self) -> Result<PortsResponse, ClientError> {
        self.send(self.http.get(self.url("/api/ports"))).await
    }

    pub async fn cleanup_ports(&self) -> Result<PortsCleanupResponse, ClientError> {
        self.send(self.http.post(self.url("/api/ports/cleanup"))).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.http.get(self.url("/health"))).await
    }

    pub async fn health_detailed(&self) -> Result<DetailedHealthResponse, ClientError> {
        self.send(self.http.get(self.url("/api/health/detailed"))).await
    }
}
