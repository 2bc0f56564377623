// SPDX-License-Identifier: MIT

use super::*;
use crate::checkpoint::fake::FakeCheckpointWriter;
use bos_core::{FlagName, FlagValue};

#[test]
fn open_with_no_existing_file_starts_with_defaults() {
    let table = FlagTable::open_with_writer(FakeCheckpointWriter::new(), "/state/flags.json", 1_000).unwrap();
    let current = table.current();
    assert_eq!(current.global.get(&FlagName::CacheEnabled), Some(&FlagValue::Bool(true)));
}

#[test]
fn replace_persists_and_is_visible_to_subsequent_reads() {
    let table = FlagTable::open_with_writer(FakeCheckpointWriter::new(), "/state/flags.json", 1_000).unwrap();
    let mut next = (*table.current()).clone();
    next.global.insert(FlagName::CacheEnabled, FlagValue::Bool(false));
    table.replace(next).unwrap();
    assert_eq!(table.current().global.get(&FlagName::CacheEnabled), Some(&FlagValue::Bool(false)));
}

#[test]
fn replace_failure_leaves_prior_state_in_place() {
    let writer = FakeCheckpointWriter::new();
    let table = FlagTable::open_with_writer(writer.clone(), "/state/flags.json", 1_000).unwrap();
    let mut next = (*table.current()).clone();
    next.global.insert(FlagName::CacheEnabled, FlagValue::Bool(false));

    *writer.fail_write_tmp.lock() = true;
    assert!(table.replace(next).is_err());
    assert_eq!(table.current().global.get(&FlagName::CacheEnabled), Some(&FlagValue::Bool(true)));
}

#[test]
fn reopening_restores_persisted_state() {
    let writer = FakeCheckpointWriter::new();
    {
        let table = FlagTable::open_with_writer(writer.clone(), "/state/flags.json", 1_000).unwrap();
        let mut next = (*table.current()).clone();
        next.global.insert(FlagName::CircuitBreakerEnabled, FlagValue::Bool(true));
        table.replace(next).unwrap();
    }
    let reopened = FlagTable::open_with_writer(writer, "/state/flags.json", 2_000).unwrap();
    assert_eq!(reopened.current().global.get(&FlagName::CircuitBreakerEnabled), Some(&FlagValue::Bool(true)));
}
