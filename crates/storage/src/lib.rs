// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bos-storage: atomic, durable persistence for the port table and the flag
//! table.
//!
//! Both tables share the same write-temp-and-rename primitive
//! ([`checkpoint`]) so a crash mid-write can never leave either file
//! truncated or partially written.

pub mod checkpoint;
pub mod flag_table;
pub mod port_table;

pub use checkpoint::{CheckpointError, CheckpointWriter, FsCheckpointWriter};
pub use flag_table::{FlagTable, FlagTableError};
pub use port_table::{PortTable, PortTableError};
