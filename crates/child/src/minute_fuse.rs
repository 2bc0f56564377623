// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `errors_per_minute` fuse (spec.md §4.3 step 3, §3 "errors_per_minute"):
//! a token-bucket style limiter that fires once the configured budget for the
//! current 60-second window has been exhausted, independent of the
//! per-transaction and per-visit sampling.

use bos_core::Clock;

pub struct MinuteFuse<C: Clock> {
    clock: C,
    window_started_ms: parking_lot::Mutex<WindowState>,
}

struct WindowState {
    window_start_ms: u64,
    fired_in_window: u64,
}

const WINDOW_MS: u64 = 60_000;

impl<C: Clock> MinuteFuse<C> {
    pub fn new(clock: C) -> Self {
        let now = clock.epoch_ms();
        Self { clock, window_started_ms: parking_lot::Mutex::new(WindowState { window_start_ms: now, fired_in_window: 0 }) }
    }

    /// Consult and, if it fires, consume one unit of this minute's budget.
    /// `budget` is the `errors_per_minute` flag's current value (a rate,
    /// rounded down to a whole-number-per-minute budget).
    pub fn fires(&self, budget: f64) -> bool {
        if budget <= 0.0 {
            return false;
        }
        let budget = budget.floor().max(1.0) as u64;
        let now = self.clock.epoch_ms();
        let mut state = self.window_started_ms.lock();
        if now.saturating_sub(state.window_start_ms) >= WINDOW_MS {
            state.window_start_ms = now;
            state.fired_in_window = 0;
        }
        if state.fired_in_window < budget {
            state.fired_in_window += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[path = "minute_fuse_tests.rs"]
mod tests;
