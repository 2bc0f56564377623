// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flag Store (spec.md §4.2): validates and persists feature-flag mutations,
//! then fans a [`ChangeEvent`] out for every accepted change.
//!
//! Mutations are single-writer: [`FlagTable::replace`] persists before the
//! in-memory `Arc<FlagState>` swaps, so a reader never observes a value the
//! store hasn't already durably committed (spec.md §4.2 "persist before
//! ack").
//!
//! Per spec.md's Open Question on override partitioning: overrides are keyed
//! only by `serviceName`, *not* further partitioned by company or journey —
//! a service name is already unique per company (it's derived from
//! `<stepName>Service-<companyName>`), so this is not a correctness gap, but
//! a multi-tenant deployment sharing service names across companies would
//! need the partitioning spec.md leaves as a future extension.

use std::sync::Arc;

use bos_core::{ChangeEvent, ChangeEventType, Clock, EventScope, FlagName, FlagSet, FlagState, FlagValue, ServiceName, SystemClock};
use bos_storage::{FlagTable, FlagTableError, FsCheckpointWriter};

use crate::error::EngineError;
use crate::fanout::EventSink;

pub struct FlagStore<W: bos_storage::CheckpointWriter = FsCheckpointWriter, C: Clock = SystemClock> {
    table: FlagTable<W>,
    sink: Arc<dyn EventSink>,
    clock: C,
}

impl FlagStore<FsCheckpointWriter, SystemClock> {
    pub fn open(path: impl Into<std::path::PathBuf>, sink: Arc<dyn EventSink>) -> Result<Self, FlagTableError> {
        let now = SystemClock.epoch_ms();
        Self::open_with(FsCheckpointWriter, path, now, sink, SystemClock)
    }
}

impl<W: bos_storage::CheckpointWriter, C: Clock> FlagStore<W, C> {
    pub fn open_with(writer: W, path: impl Into<std::path::PathBuf>, now_ms: u64, sink: Arc<dyn EventSink>, clock: C) -> Result<Self, FlagTableError> {
        Ok(Self { table: FlagTable::open_with_writer(writer, path, now_ms)?, sink, clock })
    }

    pub fn get_effective(&self, service: &ServiceName) -> FlagSet {
        self.table.current().effective(service)
    }

    pub fn get_global(&self) -> FlagSet {
        self.table.current().global.clone()
    }

    pub fn get_overrides(&self) -> std::collections::BTreeMap<ServiceName, FlagSet> {
        self.table.current().overrides.clone()
    }

    pub fn set_global(&self, name: FlagName, value: FlagValue, reason: Option<String>, triggered_by: &str, problem_id: Option<String>) -> Result<FlagValue, EngineError> {
        let validated = bos_core::flags::validate(name, value)?;
        let mut next = (*self.table.current()).clone();
        let previous = next.global.get(&name).copied();
        next.global.insert(name, validated);
        next.updated_at_ms = self.clock.epoch_ms();
        self.commit(next, name, previous, validated, EventScope::Global, reason, triggered_by, problem_id)?;
        Ok(validated)
    }

    pub fn set_service_override(
        &self,
        service: ServiceName,
        name: FlagName,
        value: FlagValue,
        reason: Option<String>,
        triggered_by: &str,
        problem_id: Option<String>,
    ) -> Result<FlagValue, EngineError> {
        let validated = bos_core::flags::validate(name, value)?;
        let mut next = (*self.table.current()).clone();
        let previous = next.overrides.get(&service).and_then(|set| set.get(&name)).copied();
        next.overrides.entry(service.clone()).or_default().insert(name, validated);
        next.updated_at_ms = self.clock.epoch_ms();
        self.commit(next, name, previous, validated, EventScope::Service { service_name: service }, reason, triggered_by, problem_id)?;
        Ok(validated)
    }

    pub fn clear_service_override(&self, service: &ServiceName, name: FlagName, triggered_by: &str) -> Result<(), EngineError> {
        let mut next = (*self.table.current()).clone();
        let Some(overrides) = next.overrides.get_mut(service) else { return Ok(()) };
        let Some(previous) = overrides.remove(&name) else { return Ok(()) };
        if overrides.is_empty() {
            next.overrides.remove(service);
        }
        next.updated_at_ms = self.clock.epoch_ms();
        let default = name.default_value();
        self.commit(next, name, Some(previous), default, EventScope::Service { service_name: service.clone() }, None, triggered_by, None)
    }

    /// Clear every override held for `service`, resetting each overridden
    /// key back to the global value (spec.md §4.2 "ClearServiceOverride" —
    /// distinct from [`Self::clear_service_override`], which clears one
    /// flag key rather than the whole per-service map).
    pub fn clear_all_overrides_for_service(&self, service: &ServiceName, triggered_by: &str) -> Result<(), EngineError> {
        let mut next = (*self.table.current()).clone();
        let Some(overrides) = next.overrides.remove(service) else { return Ok(()) };
        next.updated_at_ms = self.clock.epoch_ms();
        self.persist(next.clone())?;
        for (name, previous) in overrides {
            let default = next.global.get(&name).copied().unwrap_or_else(|| name.default_value());
            self.emit(name, Some(previous), default, EventScope::Service { service_name: service.clone() }, None, triggered_by, None);
        }
        Ok(())
    }

    /// Reset every global flag to its documented default (spec.md §4.2
    /// round-trip law: "delete-then-get returns default").
    pub fn reset_global(&self, triggered_by: &str) -> Result<(), EngineError> {
        let mut next = (*self.table.current()).clone();
        let previous = next.global.clone();
        next.global = bos_core::flags::default_global_flags();
        next.updated_at_ms = self.clock.epoch_ms();
        self.persist(next.clone())?;
        for name in FlagName::ALL {
            let prev = previous.get(&name).copied();
            let new = next.global[&name];
            if prev != Some(new) {
                self.emit(name, prev, new, EventScope::Global, None, triggered_by, None);
            }
        }
        Ok(())
    }

    /// Reset global flags to defaults and clear every per-service override.
    pub fn reset_all(&self, triggered_by: &str) -> Result<(), EngineError> {
        let mut next = (*self.table.current()).clone();
        let previous_global = next.global.clone();
        let previous_overrides = next.overrides.clone();
        next.global = bos_core::flags::default_global_flags();
        next.overrides.clear();
        next.updated_at_ms = self.clock.epoch_ms();
        self.persist(next.clone())?;

        for name in FlagName::ALL {
            let prev = previous_global.get(&name).copied();
            let new = next.global[&name];
            if prev != Some(new) {
                self.emit(name, prev, new, EventScope::Global, Some("reset-all".into()), triggered_by, None);
            }
        }
        for (service, overrides) in previous_overrides {
            for (name, prev) in overrides {
                self.emit(name, Some(prev), name.default_value(), EventScope::Service { service_name: service.clone() }, Some("reset-all".into()), triggered_by, None);
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn commit(
        &self,
        next: FlagState,
        name: FlagName,
        previous: Option<FlagValue>,
        new: FlagValue,
        scope: EventScope,
        reason: Option<String>,
        triggered_by: &str,
        problem_id: Option<String>,
    ) -> Result<(), EngineError> {
        self.persist(next)?;
        self.emit(name, previous, new, scope, reason, triggered_by, problem_id);
        Ok(())
    }

    /// Persist `next`, failing the op rather than acknowledging a mutation
    /// the store couldn't durably commit (spec.md §4.2 "persist before ack";
    /// §7 `PersistenceWriteFailed`). `FlagTable::replace` already keeps the
    /// prior in-memory state visible on failure, so no separate rollback is
    /// needed here.
    fn persist(&self, next: FlagState) -> Result<(), EngineError> {
        self.table.replace(next).map_err(|e| EngineError::PersistenceWriteFailed(e.to_string()))
    }

    fn emit(
        &self,
        name: FlagName,
        previous: Option<FlagValue>,
        new: FlagValue,
        scope: EventScope,
        reason: Option<String>,
        triggered_by: &str,
        problem_id: Option<String>,
    ) {
        self.sink.emit_change(ChangeEvent {
            event_type: ChangeEventType::Change,
            flag_name: name,
            previous_value: previous,
            new_value: new,
            scope,
            reason,
            triggered_by: triggered_by.to_string(),
            problem_id,
            timestamp_ms: self.clock.epoch_ms(),
        });
    }
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
