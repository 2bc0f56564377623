// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bos-wire: JSON request/response DTOs shared between `bos-server`,
//! `bos-cli`, and `bos-child` (spec.md §4.8, §6 "External Interfaces").
//!
//! These types own the wire shape only — validation and business logic live
//! in `bos-engine`; this crate just needs to (de)serialize identically on
//! both ends of every HTTP hop.

pub mod admin;
pub mod child;
pub mod envelope;
pub mod flags;
pub mod headers;
pub mod health;
pub mod journey;
pub mod ports;

pub use admin::{DriverStatusEntry, ResetAndRestartResponse, ServicesResponse, ServicesStatusResponse};
pub use child::{ChildHealthResponse, ProcessRequest, ProcessResponse};
pub use envelope::ApiError;
pub use flags::{
    BulkRemediationRequest, FlagDeleteQuery, FlagGetResponse, FlagListQuery, FlagListResponse,
    FlagPutRequest, RemediationItem, RemediationRequest,
};
pub use health::{DetailedHealthResponse, HealthResponse};
pub use journey::{JourneyOutcome, SimulateJourneyRequest, SimulateMultipleRequest, SimulateMultipleResponse, SimulationOptions};
pub use ports::{PortsCleanupResponse, PortsResponse};
