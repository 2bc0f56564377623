// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Port Allocator (spec.md §4.1): hands out free TCP ports to the supervisor,
//! probing with a transient bind rather than trusting the table alone, and
//! reclaims ports whose owning service has been gone past a grace window.

use std::net::TcpListener;

use bos_core::{Clock, PortAllocation, ServiceName, SystemClock};
use bos_storage::{FsCheckpointWriter, PortTable, PortTableError};

use crate::error::EngineError;

/// Ports are released rather than cleaned up immediately when a service
/// stops, to tolerate a brief window where the supervisor is still
/// finishing teardown (spec.md §4.1 "30s grace window").
pub const STALE_GRACE_MS: u64 = 30_000;

/// Allocations loaded at startup are trusted for this long before
/// [`PortAllocator::cleanup_stale`] will bind-probe them (spec.md §4.1:
/// "on startup each persisted allocation is... trusted for 30s to permit
/// child relaunch, then CleanupStale runs").
pub const STARTUP_TRUST_MS: u64 = 30_000;

pub struct PortAllocator<W: bos_storage::CheckpointWriter = FsCheckpointWriter, C: Clock = SystemClock> {
    table: PortTable<W>,
    range_min: u16,
    range_max: u16,
    clock: C,
    opened_at_ms: u64,
}

impl PortAllocator<FsCheckpointWriter, SystemClock> {
    pub fn open(path: impl Into<std::path::PathBuf>, range_min: u16, range_max: u16) -> Result<Self, PortTableError> {
        Self::open_with(FsCheckpointWriter, path, range_min, range_max, SystemClock)
    }
}

impl<W: bos_storage::CheckpointWriter, C: Clock> PortAllocator<W, C> {
    pub fn open_with(writer: W, path: impl Into<std::path::PathBuf>, range_min: u16, range_max: u16, clock: C) -> Result<Self, PortTableError> {
        let opened_at_ms = clock.epoch_ms();
        Ok(Self { table: PortTable::open_with_writer(writer, path)?, range_min, range_max, clock, opened_at_ms })
    }

    /// The previously-persisted port for `service_name`, if its allocation is
    /// live (not released) and currently bindable (spec.md §4.1 "returns the
    /// previously-persisted port for `serviceName` if it is currently
    /// bindable").
    pub fn reserved_for(&self, service_name: &str) -> Option<u16> {
        let allocation = self.table.snapshot().into_iter().find(|a| a.released_at_ms.is_none() && a.service_name.as_str() == service_name)?;
        TcpListener::bind(("127.0.0.1", allocation.port)).ok()?;
        Some(allocation.port)
    }

    /// Reclaim stale allocations, then either honor `service_name`'s
    /// previously-persisted port (if still bindable) or hand out the lowest
    /// bindable port in range, persisting before returning it.
    pub fn allocate(&self, service_name: &str) -> Result<PortAllocation, EngineError> {
        self.cleanup_stale()?;

        let now = self.clock.epoch_ms();

        if let Some(port) = self.reserved_for(service_name) {
            let allocation = PortAllocation { port, service_name: ServiceName::from(service_name), allocated_at_ms: now, released_at_ms: None };
            self.table.insert(allocation.clone()).map_err(|e| EngineError::PersistenceWriteFailed(e.to_string()))?;
            return Ok(allocation);
        }

        let taken: std::collections::HashSet<u16> = self.table.snapshot().iter().filter(|a| a.released_at_ms.is_none()).map(|a| a.port).collect();

        for port in self.range_min..=self.range_max {
            if taken.contains(&port) {
                continue;
            }
            if TcpListener::bind(("127.0.0.1", port)).is_err() {
                continue;
            }
            let allocation = PortAllocation {
                port,
                service_name: ServiceName::from(service_name),
                allocated_at_ms: now,
                released_at_ms: None,
            };
            self.table
                .insert(allocation.clone())
                .map_err(|e| EngineError::PersistenceWriteFailed(e.to_string()))?;
            return Ok(allocation);
        }
        Err(EngineError::PortExhausted)
    }

    /// Mark `port`'s allocation released (not deleted — it stays visible
    /// until [`Self::cleanup_stale`] reclaims it past the grace window).
    pub fn release(&self, port: u16) -> Result<(), EngineError> {
        if let Some(mut allocation) = self.table.get(port) {
            allocation.released_at_ms = Some(self.clock.epoch_ms());
            self.table
                .insert(allocation)
                .map_err(|e| EngineError::PersistenceWriteFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Permanently drop allocations released more than [`STALE_GRACE_MS`] ago,
    /// then bind-probe every remaining live allocation older than
    /// [`STARTUP_TRUST_MS`]: if the probe bind succeeds, nothing is actually
    /// listening on that port despite the table claiming it's live — a
    /// zombie allocation (spec.md §4.1 "detect stale reservations by probing
    /// bind availability"; §8 scenario 3 "Zombie cleanup") — so it is removed
    /// outright rather than soft-released.
    pub fn cleanup_stale(&self) -> Result<usize, EngineError> {
        let now = self.clock.epoch_ms();
        let mut removed = 0;
        for allocation in self.table.snapshot() {
            match allocation.released_at_ms {
                Some(released_at) if now.saturating_sub(released_at) >= STALE_GRACE_MS => {
                    if self.table.remove(allocation.port).map_err(|e| EngineError::PersistenceWriteFailed(e.to_string()))? {
                        removed += 1;
                    }
                }
                Some(_) => {}
                None => {
                    if now.saturating_sub(self.opened_at_ms) < STARTUP_TRUST_MS {
                        continue;
                    }
                    if TcpListener::bind(("127.0.0.1", allocation.port)).is_ok()
                        && self.table.remove(allocation.port).map_err(|e| EngineError::PersistenceWriteFailed(e.to_string()))?
                    {
                        removed += 1;
                    }
                }
            }
        }
        Ok(removed)
    }

    pub fn snapshot(&self) -> Vec<PortAllocation> {
        self.table.snapshot()
    }

    pub fn is_allocated(&self, port: u16) -> bool {
        self.table.get(port).is_some_and(|a| a.released_at_ms.is_none())
    }
}

#[cfg(test)]
#[path = "ports_tests.rs"]
mod tests;
