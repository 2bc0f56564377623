// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable port-allocation table backing the Port Allocator (spec.md §4.1).

use std::path::{Path, PathBuf};

use bos_core::PortAllocation;
use parking_lot::RwLock;

use crate::checkpoint::{self, CheckpointWriter, FsCheckpointWriter};

#[derive(Debug, thiserror::Error)]
pub enum PortTableError {
    #[error(transparent)]
    Checkpoint(#[from] checkpoint::CheckpointError),
}

/// The persisted set of live port allocations, keyed by port.
///
/// Every mutating call durably replaces the on-disk file before returning;
/// readers take a cheap read lock over an in-memory `Vec` clone.
pub struct PortTable<W: CheckpointWriter = FsCheckpointWriter> {
    writer: W,
    path: PathBuf,
    allocations: RwLock<Vec<PortAllocation>>,
}

impl PortTable<FsCheckpointWriter> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PortTableError> {
        Self::open_with_writer(FsCheckpointWriter, path)
    }
}

impl<W: CheckpointWriter> PortTable<W> {
    pub fn open_with_writer(writer: W, path: impl Into<PathBuf>) -> Result<Self, PortTableError> {
        let path = path.into();
        let allocations = checkpoint::load_json(&writer, &path)?.unwrap_or_default();
        Ok(Self { writer, path, allocations: RwLock::new(allocations) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All currently-persisted allocations, in no particular order.
    pub fn snapshot(&self) -> Vec<PortAllocation> {
        self.allocations.read().clone()
    }

    pub fn get(&self, port: u16) -> Option<PortAllocation> {
        self.allocations.read().iter().find(|a| a.port == port).cloned()
    }

    pub fn is_allocated(&self, port: u16) -> bool {
        self.allocations.read().iter().any(|a| a.port == port)
    }

    /// Insert (or replace) the allocation for `allocation.port`, persisting
    /// before returning.
    pub fn insert(&self, allocation: PortAllocation) -> Result<(), PortTableError> {
        let mut guard = self.allocations.write();
        let mut next = guard.clone();
        next.retain(|a| a.port != allocation.port);
        next.push(allocation);
        checkpoint::replace_json(&self.writer, &self.path, &next)?;
        *guard = next;
        Ok(())
    }

    /// Remove the allocation for `port`, persisting before returning.
    /// Returns whether an allocation was actually removed.
    pub fn remove(&self, port: u16) -> Result<bool, PortTableError> {
        let mut guard = self.allocations.write();
        let before = guard.len();
        let mut next = guard.clone();
        next.retain(|a| a.port != port);
        let removed = next.len() != before;
        if removed {
            checkpoint::replace_json(&self.writer, &self.path, &next)?;
            *guard = next;
        }
        Ok(removed)
    }

    /// Replace the whole table atomically (used by stale-allocation cleanup).
    pub fn replace_all(&self, allocations: Vec<PortAllocation>) -> Result<(), PortTableError> {
        checkpoint::replace_json(&self.writer, &self.path, &allocations)?;
        *self.allocations.write() = allocations;
        Ok(())
    }
}

#[cfg(test)]
#[path = "port_table_tests.rs"]
mod tests;
