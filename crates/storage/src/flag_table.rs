// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable flag-state table backing the Flag Store (spec.md §4.2).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bos_core::FlagState;
use parking_lot::RwLock;

use crate::checkpoint::{self, CheckpointWriter, FsCheckpointWriter};

#[derive(Debug, thiserror::Error)]
pub enum FlagTableError {
    #[error(transparent)]
    Checkpoint(#[from] checkpoint::CheckpointError),
}

/// The persisted [`FlagState`] (global flags + per-service overrides).
///
/// Readers clone the `Arc<FlagState>` out from under a read lock rather than
/// cloning the whole structure, so readers never block on each other or on a
/// concurrent writer for longer than the pointer swap itself (spec.md §4.2:
/// "readers never block writers or each other").
pub struct FlagTable<W: CheckpointWriter = FsCheckpointWriter> {
    writer: W,
    path: PathBuf,
    state: RwLock<Arc<FlagState>>,
}

impl FlagTable<FsCheckpointWriter> {
    pub fn open(path: impl Into<PathBuf>, now_ms: u64) -> Result<Self, FlagTableError> {
        Self::open_with_writer(FsCheckpointWriter, path, now_ms)
    }
}

impl<W: CheckpointWriter> FlagTable<W> {
    pub fn open_with_writer(writer: W, path: impl Into<PathBuf>, now_ms: u64) -> Result<Self, FlagTableError> {
        let path = path.into();
        let state = checkpoint::load_json(&writer, &path)?.unwrap_or_else(|| FlagState::new(now_ms));
        Ok(Self { writer, path, state: RwLock::new(Arc::new(state)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A cheap snapshot of the current state (an `Arc` clone, not a deep copy).
    pub fn current(&self) -> Arc<FlagState> {
        self.state.read().clone()
    }

    /// Replace the whole state with `next`, persisting before the swap is
    /// visible to readers. On persistence failure the prior state is kept
    /// (spec.md §4.2 "PersistenceWriteFailed" rollback).
    pub fn replace(&self, next: FlagState) -> Result<(), FlagTableError> {
        checkpoint::replace_json(&self.writer, &self.path, &next)?;
        *self.state.write() = Arc::new(next);
        Ok(())
    }
}

#[cfg(test)]
#[path = "flag_table_tests.rs"]
mod tests;
