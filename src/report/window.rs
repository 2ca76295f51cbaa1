//! Recency window arithmetic

use chrono::{DateTime, Utc};

/// Whole seconds between `recorded` and `now`
///
/// A record stamped after `now` (clock skew between writers) has age 0.
pub fn age_secs(now: DateTime<Utc>, recorded: DateTime<Utc>) -> u64 {
    let elapsed = now.signed_duration_since(recorded).num_seconds();
    u64::try_from(elapsed).unwrap_or(0)
}

/// Inclusive window test: a record exactly `last_seconds` old qualifies
pub fn within_window(now: DateTime<Utc>, recorded: DateTime<Utc>, last_seconds: u64) -> bool {
    age_secs(now, recorded) <= last_seconds
}
