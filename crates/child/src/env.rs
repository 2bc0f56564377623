// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the Child Service Runtime
//! (spec.md §4.3 "Launch contract", §6 "Command-line / environment surface").
//!
//! Mirrors `bos-server::env`'s one-function-per-var layout: every accessor
//! parses with a sane default and never panics on a malformed value.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChildEnvError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} has an invalid value: {1:?}")]
    Invalid(&'static str, String),
}

fn require(name: &'static str) -> Result<String, ChildEnvError> {
    std::env::var(name).map_err(|_| ChildEnvError::Missing(name))
}

/// Everything the launch contract (spec.md §4.3) guarantees is present in a
/// Child Service Runtime's environment.
#[derive(Debug, Clone)]
pub struct ChildIdentity {
    pub service_name: String,
    pub port: u16,
    pub company_name: String,
    pub domain: String,
    pub industry_type: String,
    pub journey_type: String,
    pub engine_base_url: String,
}

impl ChildIdentity {
    pub fn from_env() -> Result<Self, ChildEnvError> {
        let port_raw = require("PORT")?;
        let port = port_raw.parse::<u16>().map_err(|_| ChildEnvError::Invalid("PORT", port_raw))?;
        Ok(Self {
            service_name: require("SERVICE_NAME")?,
            port,
            company_name: require("COMPANY_NAME")?,
            domain: require("DOMAIN")?,
            industry_type: require("INDUSTRY_TYPE")?,
            journey_type: std::env::var("JOURNEY_TYPE").unwrap_or_default(),
            engine_base_url: require("BOS_ENGINE_BASE_URL")?,
        })
    }
}

/// How long an effective-flag-set fetch from the engine is cached before a
/// `/process` call fetches again (spec.md §4.3 step 2: "cache for <= 1s").
pub fn flag_cache_ttl() -> Duration {
    std::env::var("BOS_FLAG_CACHE_TTL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(1_000))
}

/// Shutdown drain timeout: how long `/process` in flight is allowed to
/// finish before the listener closes on `SIGTERM` (spec.md §4.3 "Shutdown").
pub fn drain_timeout() -> Duration {
    std::env::var("BOS_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}
