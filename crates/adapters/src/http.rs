// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client adapter used by the orchestrator (→ child `/process`), the
//! child runtime (→ flag store), and the event fan-out (→ observability
//! sink) (spec.md §4.5, §4.3, §4.7).
//!
//! Wrapped behind a trait, the same shape as [`crate::spawn::ProcessAdapter`],
//! so `bos-engine` tests never make a real network call.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("non-2xx response: {status}")]
    Status { status: u16, body: Value },
}

/// An outbound request, destination-agnostic.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstracts the actual network call for testability.
#[async_trait]
pub trait HttpClient: Send + Sync + 'static {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Production adapter backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        builder = builder.timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                HttpError::Timeout(request.timeout)
            } else {
                HttpError::Transport(err.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !(200..300).contains(&status) {
            return Err(HttpError::Status { status, body });
        }
        Ok(HttpResponse { status, body })
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    //! A scripted [`HttpClient`] for tests: returns canned responses keyed
    //! by URL, recording every request sent.
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeHttpClient {
        pub sent: Arc<Mutex<Vec<HttpRequest>>>,
        responses: Arc<Mutex<HashMap<String, Result<HttpResponse, String>>>>,
    }

    impl FakeHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn stub(&self, url: impl Into<String>, response: HttpResponse) {
            self.responses.lock().insert(url.into(), Ok(response));
        }

        pub fn stub_error(&self, url: impl Into<String>, message: impl Into<String>) {
            self.responses.lock().insert(url.into(), Err(message.into()));
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().len()
        }
    }

    #[async_trait]
    impl HttpClient for FakeHttpClient {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.sent.lock().push(request.clone());
            match self.responses.lock().get(&request.url) {
                Some(Ok(response)) => {
                    if response.is_success() {
                        Ok(response.clone())
                    } else {
                        Err(HttpError::Status { status: response.status, body: response.body.clone() })
                    }
                }
                Some(Err(message)) => Err(HttpError::Transport(message.clone())),
                None => Err(HttpError::Transport(format!("no stub registered for {}", request.url))),
            }
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
