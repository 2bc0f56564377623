// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Saved journey configurations: the `config-<id>.json` files spec.md §6
//! documents as the on-disk shape a journey can be persisted under and
//! replayed from later.
//!
//! One file per config, directory-scanned the way the teacher's runbook
//! loader scans `.oj/runbooks/` for command definitions — narrowed here to a
//! flat directory of JSON files instead of a recursive multi-format tree,
//! since `config-<id>.json` is the only shape this system ever writes.

use std::path::{Path, PathBuf};

use bos_storage::{replace_json, CheckpointError, CheckpointWriter, FsCheckpointWriter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bos_core::journey::{CustomerProfile, StepSpec};
use bos_core::JourneySpec;

/// Current `config-<id>.json` schema version this crate writes.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("saved config {0:?} not found")]
    NotFound(String),
}

/// The on-disk shape of a saved journey (spec.md §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJourneyConfig {
    pub id: String,
    pub name: String,
    pub company_name: String,
    pub domain: String,
    pub industry_type: String,
    pub steps: Vec<StepSpec>,
    #[serde(default)]
    pub customer_profile: CustomerProfile,
    pub timestamp: u64,
    pub version: u32,
}

impl SavedJourneyConfig {
    pub fn from_journey_spec(id: impl Into<String>, name: impl Into<String>, journey: &JourneySpec, timestamp_ms: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            company_name: journey.company_name.clone(),
            domain: journey.domain.clone(),
            industry_type: journey.industry_type.clone(),
            steps: journey.steps.clone(),
            customer_profile: journey.customer_profile.clone(),
            timestamp: timestamp_ms,
            version: CURRENT_CONFIG_VERSION,
        }
    }

    /// Build a submittable [`JourneySpec`] from this saved config, minting a
    /// fresh `journeyId` (a replayed config is a new journey run, not a
    /// resumption of the original one).
    pub fn to_journey_spec(&self) -> JourneySpec {
        JourneySpec::new(self.company_name.clone(), self.domain.clone(), self.industry_type.clone())
            .with_steps(self.steps.clone())
    }
}

fn config_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("config-{id}.json"))
}

/// Directory-backed store of [`SavedJourneyConfig`]s.
pub struct ConfigStore<W: CheckpointWriter = FsCheckpointWriter> {
    writer: W,
    dir: PathBuf,
}

impl ConfigStore<FsCheckpointWriter> {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::open_with_writer(FsCheckpointWriter, dir)
    }
}

impl<W: CheckpointWriter> ConfigStore<W> {
    pub fn open_with_writer(writer: W, dir: impl Into<PathBuf>) -> Self {
        Self { writer, dir: dir.into() }
    }

    pub fn save(&self, config: &SavedJourneyConfig) -> Result<(), ConfigError> {
        let path = config_path(&self.dir, &config.id);
        replace_json(&self.writer, &path, config)?;
        Ok(())
    }

    pub fn load(&self, id: &str) -> Result<SavedJourneyConfig, ConfigError> {
        let path = config_path(&self.dir, id);
        bos_storage::load_json(&self.writer, &path)?.ok_or_else(|| ConfigError::NotFound(id.to_string()))
    }

    pub fn delete(&self, id: &str) -> Result<bool, ConfigError> {
        let path = config_path(&self.dir, id);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }

    /// List every saved config in the directory, sorted by id.
    ///
    /// Unreadable or unparsable files are skipped with a warning rather than
    /// failing the whole listing (spec.md §6 doesn't require strict
    /// validation of pre-existing files on disk).
    pub fn list(&self) -> Result<Vec<SavedJourneyConfig>, ConfigError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut configs = Vec::new();
        for entry in std::fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read(&path) {
                Ok(bytes) => match serde_json::from_slice::<SavedJourneyConfig>(&bytes) {
                    Ok(config) => configs.push(config),
                    Err(err) => tracing::warn!(path = %path.display(), error = %err, "skipping unparsable saved journey config"),
                },
                Err(err) => tracing::warn!(path = %path.display(), error = %err, "skipping unreadable saved journey config"),
            }
        }
        configs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(configs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
