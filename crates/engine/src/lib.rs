// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bos-engine: the business-observability simulation engine's core
//! components — Port Allocator (C1), Flag Store (C2), Service Supervisor
//! (C4), Journey Orchestrator (C5), Auto-Load Generator (C6), and Event
//! Fan-out (C7). `bos-server` wires these together behind the public HTTP
//! API; `bos-child` is the process these components spawn and supervise.

pub mod autoload;
pub mod error;
pub mod fanout;
pub mod flags;
pub mod orchestrator;
pub mod ports;
pub mod supervisor;

pub use autoload::{AutoLoadConfig, AutoLoadGenerator, DriverSnapshot, DriverStats, DriverStatus};
pub use error::EngineError;
pub use fanout::{EventFanout, EventSink, FanoutMetrics, OutboundEvent};
pub use flags::FlagStore;
pub use orchestrator::{JourneyOrchestrator, SimulationOptions};
pub use ports::PortAllocator;
pub use supervisor::{ServiceSupervisor, SupervisorConfig};
