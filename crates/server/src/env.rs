// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the public API process
//! (spec.md §6 "Command-line / environment surface").
//!
//! One accessor per variable, every one parsed with a sane default — never
//! panics on a malformed value, mirroring `bos-child::env`'s layout.

use std::path::PathBuf;
use std::time::Duration;

/// Working directory for persisted state (port table, flag table, saved
/// journey configs) — `BOS_STATE_DIR` > `XDG_STATE_HOME/bos` >
/// `~/.local/state/bos`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BOS_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("bos");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".local/state/bos")
}

pub fn port_table_path() -> PathBuf {
    state_dir().join("ports.json")
}

pub fn flag_table_path() -> PathBuf {
    state_dir().join("flags.json")
}

pub fn config_dir() -> PathBuf {
    state_dir().join("configs")
}

/// Main server listen port (spec.md §6, default 8080).
pub fn port() -> u16 {
    std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok()).unwrap_or(8080)
}

/// Child service port range (spec.md §4.1, default `20000..=20999`).
pub fn service_port_range() -> (u16, u16) {
    let min = std::env::var("SERVICE_PORT_MIN").ok().and_then(|s| s.parse::<u16>().ok()).unwrap_or(20_000);
    let max = std::env::var("SERVICE_PORT_MAX").ok().and_then(|s| s.parse::<u16>().ok()).unwrap_or(20_999);
    (min, max)
}

/// Observability platform environment name, forwarded to children as
/// `BOS_OBSERVABILITY_ENVIRONMENT` (spec.md §6 "observability credentials").
pub fn dt_environment() -> Option<String> {
    std::env::var("DT_ENVIRONMENT").ok().filter(|s| !s.is_empty())
}

/// Observability platform API token. Required for event fan-out delivery to
/// succeed against a real destination; absent in local/dev runs where the
/// fan-out destination is unset or unreachable.
pub fn dt_api_token() -> Option<String> {
    std::env::var("DT_API_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Event fan-out destination URL. Required for delivery; with none set the
/// fan-out still runs (queues and retries) but every delivery attempt fails.
pub fn fanout_destination_url() -> Option<String> {
    std::env::var("BOS_FANOUT_DESTINATION_URL").ok().filter(|s| !s.is_empty())
}

/// Auto-Load Generator opt-in (spec.md §4.6, off by default).
pub fn enable_continuous_journeys() -> bool {
    std::env::var("ENABLE_CONTINUOUS_JOURNEYS").ok().as_deref() == Some("true")
}

pub fn journey_interval() -> Duration {
    std::env::var("JOURNEY_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(bos_engine::autoload::DEFAULT_JOURNEY_INTERVAL_MS))
}

pub fn journey_batch_size() -> u32 {
    std::env::var("JOURNEY_BATCH_SIZE").ok().and_then(|s| s.parse::<u32>().ok()).unwrap_or(bos_engine::autoload::DEFAULT_BATCH_SIZE)
}

pub fn watch_interval() -> Duration {
    std::env::var("BOS_WATCH_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(bos_engine::autoload::DEFAULT_WATCH_INTERVAL_MS))
}

/// Global concurrency bound shared by `SimulateMultipleCustomers` and the
/// Auto-Load Generator (spec.md §4.5 SUPPLEMENT, §4.6, default 50).
pub fn max_concurrent() -> usize {
    std::env::var("BOS_MAX_CONCURRENT").ok().and_then(|s| s.parse::<usize>().ok()).unwrap_or(50)
}

/// Service names `StopAll`/`reset-and-restart` must never tear down
/// (spec.md §4.4 SUPPLEMENT), comma-separated.
pub fn preserved_services() -> Vec<String> {
    std::env::var("BOS_PRESERVED_SERVICES")
        .ok()
        .map(|raw| raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Path to the `bos-child` binary the supervisor spawns for each step
/// (spec.md §4.3 launch contract).
pub fn child_binary_path() -> PathBuf {
    std::env::var("BOS_CHILD_BINARY_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("bos-child"))
}

/// Per-step timeout for orchestrator → child `/process` calls (spec.md §4.5,
/// default 30s).
pub fn step_timeout() -> Duration {
    std::env::var("BOS_STEP_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(30))
}

/// Shutdown drain timeout: how long in-flight requests and fan-out delivery
/// are allowed to finish before forcing exit (spec.md §6, §4.7, default 5s,
/// bounded ≤ 10s per §5 "Cancellation").
pub fn drain_timeout() -> Duration {
    std::env::var("BOS_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// `bos-server`'s own base URL, handed to spawned children as
/// `BOS_ENGINE_BASE_URL` so their `/process` flag fetch can reach
/// `GET /api/feature_flag` (spec.md §4.3 step 2).
pub fn engine_base_url() -> String {
    std::env::var("BOS_ENGINE_BASE_URL").unwrap_or_else(|_| format!("http://127.0.0.1:{}", port()))
}
