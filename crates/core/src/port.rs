// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted port-allocation record (spec.md §3 "PortAllocation").

use serde::{Deserialize, Serialize};

use crate::service::ServiceName;

/// One persisted `{port, serviceName, allocatedAt}` entry.
///
/// Invariant (enforced by the allocator, not this type): `port` is unique
/// across every live [`PortAllocation`] at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortAllocation {
    pub port: u16,
    pub service_name: ServiceName,
    /// Epoch milliseconds when this port was allocated.
    pub allocated_at_ms: u64,
    /// Epoch milliseconds when the owning service was released, if any.
    /// `None` means the allocation is still live; `Some` starts the grace
    /// window before [`crate`]'s consumers may reclaim the port.
    #[serde(default)]
    pub released_at_ms: Option<u64>,
}
