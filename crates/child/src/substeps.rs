// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Substep duration accumulation (spec.md §4.3 step 4: "sum declared substep
//! durations, jittered +/-20%, then sleep that long before responding").

use bos_core::SubstepSpec;
use rand::Rng;

const JITTER_MIN: f64 = 0.8;
const JITTER_MAX: f64 = 1.2;

/// Sum `substeps`' declared durations, applying independent uniform jitter in
/// `[0.8, 1.2]` to each one.
pub fn accumulate_duration(substeps: &[SubstepSpec], rng: &mut impl Rng) -> u64 {
    substeps
        .iter()
        .map(|substep| {
            let jitter = rng.gen_range(JITTER_MIN..=JITTER_MAX);
            (substep.duration_ms as f64 * jitter).round() as u64
        })
        .sum()
}

#[cfg(test)]
#[path = "substeps_tests.rs"]
mod tests;
