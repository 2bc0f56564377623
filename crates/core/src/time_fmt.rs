// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable elapsed-time formatting for CLI and status output.

use std::time::Duration;

/// Format a duration as `"Xh Ym Zs"`, dropping leading zero units.
pub fn format_elapsed(elapsed: Duration) -> String {
    format_elapsed_ms(elapsed.as_millis() as u64)
}

/// Format a millisecond count as `"Xh Ym Zs"`, dropping leading zero units.
pub fn format_elapsed_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else if total_secs > 0 {
        format!("{seconds}s")
    } else {
        format!("{ms}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_second_shows_millis() {
        assert_eq!(format_elapsed_ms(250), "250ms");
    }

    #[test]
    fn seconds_only() {
        assert_eq!(format_elapsed_ms(45_000), "45s");
    }

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(format_elapsed_ms(125_000), "2m 5s");
    }

    #[test]
    fn hours_minutes_seconds() {
        assert_eq!(format_elapsed_ms(3_725_000), "1h 2m 5s");
    }

    #[test]
    fn duration_wrapper_matches_ms() {
        assert_eq!(format_elapsed(Duration::from_millis(125_000)), format_elapsed_ms(125_000));
    }
}
