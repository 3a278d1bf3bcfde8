// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Milliseconds in one day.
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a whole number of days to milliseconds.
pub fn days_to_millis(days: i64) -> i64 {
    days.saturating_mul(DAY_MILLIS)
}

/// Format epoch milliseconds as RFC3339 using a `Z` suffix.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn format_millis_rfc3339(millis: i64) -> String {
    let date = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis_rfc3339(0), "1970-01-01T00:00:00Z");
        assert_eq!(
            format_millis_rfc3339(1_704_103_200_000),
            "2024-01-01T10:00:00Z"
        );
    }

    #[test]
    fn test_days_to_millis() {
        assert_eq!(days_to_millis(1), 86_400_000);
        assert_eq!(days_to_millis(i64::MAX), i64::MAX);
    }
}
