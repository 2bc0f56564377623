// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

//! Adapters for the two forms of I/O the Service Supervisor and Journey
//! Orchestrator perform: launching Child Service Runtime processes
//! ([`spawn`]) and talking HTTP to them and to the feature-flag API
//! ([`http`]).

pub mod http;
pub mod spawn;

pub use http::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use spawn::{ChildSpawnSpec, OsProcessAdapter, ProcessAdapter, SpawnError, SpawnedChild};
