// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic write-temp-and-rename persistence, shared by the port table and the
//! flag table (spec.md §4.1/§4.2 "persists via atomic write-temp+rename").
//!
//! Unlike a background-thread checkpointer, every write here happens
//! synchronously on the caller's thread and must complete (including the
//! directory fsync) before the mutating call returns — the port table and
//! flag table are small and must be durable before the allocator/flag-store
//! acknowledges the mutation.
//!
//! The [`CheckpointWriter`] trait abstracts the filesystem calls so tests can
//! inject a [`FakeCheckpointWriter`] and exercise partial-failure scenarios
//! deterministically.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Abstracts the filesystem operations an atomic replace needs.
pub trait CheckpointWriter: Send + Sync + 'static {
    fn write_tmp(&self, path: &Path, data: &[u8]) -> Result<(), CheckpointError>;
    fn fsync_file(&self, path: &Path) -> Result<(), CheckpointError>;
    fn rename(&self, from: &Path, to: &Path) -> Result<(), CheckpointError>;
    fn fsync_dir(&self, path: &Path) -> Result<(), CheckpointError>;
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, CheckpointError>;
}

/// Production writer, backed by real filesystem calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCheckpointWriter;

impl CheckpointWriter for FsCheckpointWriter {
    fn write_tmp(&self, path: &Path, data: &[u8]) -> Result<(), CheckpointError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(data)?;
        Ok(())
    }

    fn fsync_file(&self, path: &Path) -> Result<(), CheckpointError> {
        File::open(path)?.sync_all()?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), CheckpointError> {
        std::fs::rename(from, to)?;
        Ok(())
    }

    fn fsync_dir(&self, path: &Path) -> Result<(), CheckpointError> {
        File::open(path)?.sync_all()?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, CheckpointError> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }
}

/// Serialize `value` to JSON and durably replace `path` with it:
/// write-to-`.tmp` → fsync tmp → rename → fsync parent directory.
pub fn replace_json<W: CheckpointWriter, T: serde::Serialize>(
    writer: &W,
    path: &Path,
    value: &T,
) -> Result<(), CheckpointError> {
    let tmp_path = tmp_path_for(path);
    let bytes = serde_json::to_vec_pretty(value)?;
    writer.write_tmp(&tmp_path, &bytes)?;
    writer.fsync_file(&tmp_path)?;
    writer.rename(&tmp_path, path)?;
    if let Some(parent) = path.parent() {
        writer.fsync_dir(parent)?;
    }
    Ok(())
}

/// Read and parse `path` as JSON, returning `None` if it doesn't exist yet.
pub fn load_json<W: CheckpointWriter, T: serde::de::DeserializeOwned>(
    writer: &W,
    path: &Path,
) -> Result<Option<T>, CheckpointError> {
    match writer.read(path)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    //! A deterministic in-memory [`CheckpointWriter`] for tests, including
    //! error-injection hooks for crash-scenario coverage.
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeCheckpointWriter {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
        pub fail_write_tmp: Arc<Mutex<bool>>,
        pub fail_rename: Arc<Mutex<bool>>,
    }

    impl FakeCheckpointWriter {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl CheckpointWriter for FakeCheckpointWriter {
        fn write_tmp(&self, path: &Path, data: &[u8]) -> Result<(), CheckpointError> {
            if *self.fail_write_tmp.lock() {
                return Err(CheckpointError::Io(std::io::Error::other("injected write failure")));
            }
            self.files.lock().insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }

        fn fsync_file(&self, _path: &Path) -> Result<(), CheckpointError> {
            Ok(())
        }

        fn rename(&self, from: &Path, to: &Path) -> Result<(), CheckpointError> {
            if *self.fail_rename.lock() {
                return Err(CheckpointError::Io(std::io::Error::other("injected rename failure")));
            }
            let mut files = self.files.lock();
            if let Some(data) = files.remove(from) {
                files.insert(to.to_path_buf(), data);
            }
            Ok(())
        }

        fn fsync_dir(&self, _path: &Path) -> Result<(), CheckpointError> {
            Ok(())
        }

        fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, CheckpointError> {
            Ok(self.files.lock().get(path).cloned())
        }
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
