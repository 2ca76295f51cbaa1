//! Time and timestamp utilities
//!
//! Stored timestamps use a single fixed encoding: UTC, one-second
//! resolution, no offset marker (`2025-01-06 12:00:00`).

use chrono::{DateTime, NaiveDateTime, SubsecRound, Timelike, Utc};
use parking_lot::Mutex;
use thiserror::Error;

/// Format of every stored `eventtimestamputc` value
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stored timestamp that is not in the fixed encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("{0}")]
    Parse(#[from] chrono::ParseError),

    #[error("not in canonical YYYY-MM-DD HH:MM:SS form")]
    NonCanonical,
}

/// Source of the current instant
///
/// Injected into the event log and the report engine so that time-dependent
/// behavior can be driven deterministically in tests.
pub trait Clock: Send + Sync {
    /// Current UTC instant, at whatever precision the source provides
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC instant truncated to whole seconds
    fn now_truncated(&self) -> DateTime<Utc> {
        self.now().trunc_subsecs(0)
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward (or backward, for negative values)
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        *now += chrono::Duration::seconds(secs);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Encode an instant in the stored timestamp format
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Decode a stored timestamp; anything not in the exact format is rejected
///
/// chrono's parser tolerates unpadded fields, stray whitespace and leap
/// seconds, so the value must also re-encode to the same string.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)?;
    let instant = naive.and_utc();

    if naive.nanosecond() != 0 || format_timestamp(instant) != raw {
        return Err(TimestampError::NonCanonical);
    }
    Ok(instant)
}
