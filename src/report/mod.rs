//! Report Engine - recency-window queries
//!
//! Answers "events for `userid` within the last `last_seconds` seconds, as
//! of now". Storage only knows two fixed read shapes; every piece of time
//! arithmetic lives here.
//!
//! Edge-case policy:
//! - "now" is sampled once per call, truncated to whole seconds
//! - the window is inclusive (`age <= last_seconds`)
//! - records dated in the future count as age 0 and are always included
//! - a record whose timestamp does not parse is skipped and logged

mod window;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::event_store::{EventLog, EventLogResult};
use crate::types::EventRecord;
use crate::utils::time::{parse_timestamp, Clock};

pub use window::{age_secs, within_window};

/// A stored record whose timestamp could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event {id} has unparsable timestamp {raw:?}: {reason}")]
pub struct CorruptRecord {
    pub id: i64,
    pub raw: String,
    pub reason: String,
}

/// Result of a report, including records that had to be skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Matching records in ascending id order
    pub events: Vec<EventRecord>,
    /// Records excluded because their timestamp was unreadable
    pub corrupt: Vec<CorruptRecord>,
}

/// Windowed reports over an [`EventLog`]
pub struct ReportEngine {
    log: Arc<EventLog>,
    clock: Arc<dyn Clock>,
}

impl ReportEngine {
    /// Create an engine that shares the log's time source
    pub fn new(log: Arc<EventLog>) -> Self {
        let clock = log.clock();
        Self { log, clock }
    }

    /// Create an engine with its own time source
    pub fn with_clock(log: Arc<EventLog>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// The underlying event log
    pub fn log(&self) -> &Arc<EventLog> {
        &self.log
    }

    /// Events for `userid` no older than `last_seconds`
    pub fn report(&self, userid: &str, last_seconds: u64) -> EventLogResult<Vec<EventRecord>> {
        Ok(self.report_detailed(userid, last_seconds)?.events)
    }

    /// Like [`report`](Self::report), but also returns skipped records
    pub fn report_detailed(
        &self,
        userid: &str,
        last_seconds: u64,
    ) -> EventLogResult<ReportOutcome> {
        let candidates = self.log.read_by_user(userid)?;
        let now = self.clock.now_truncated();

        let outcome = filter_window(candidates, now, last_seconds);
        debug!(
            userid,
            last_seconds,
            matched = outcome.events.len(),
            corrupt = outcome.corrupt.len(),
            "report computed"
        );
        Ok(outcome)
    }
}

/// Keep the records of `candidates` that fall inside the window ending at `now`
pub fn filter_window(
    candidates: Vec<EventRecord>,
    now: DateTime<Utc>,
    last_seconds: u64,
) -> ReportOutcome {
    let mut outcome = ReportOutcome::default();

    for record in candidates {
        match parse_timestamp(&record.timestamp) {
            Ok(recorded) => {
                if within_window(now, recorded, last_seconds) {
                    outcome.events.push(record);
                }
            }
            Err(e) => {
                let corrupt = CorruptRecord {
                    id: record.id,
                    raw: record.timestamp,
                    reason: e.to_string(),
                };
                warn!(
                    id = corrupt.id,
                    raw = %corrupt.raw,
                    "skipping corrupt record: {}",
                    corrupt.reason
                );
                outcome.corrupt.push(corrupt);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::EventLogConfig;
    use crate::utils::time::ManualClock;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap()
    }

    fn create_test_engine() -> (ReportEngine, Arc<ManualClock>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = EventLogConfig::new(temp_dir.path().join("analytics.db"));
        let clock = Arc::new(ManualClock::new(start()));
        let log = Arc::new(EventLog::open_with_clock(config, clock.clone()).unwrap());

        (ReportEngine::new(log), clock, temp_dir)
    }

    #[test]
    fn test_filter_window_keeps_order() {
        let now = start();
        let candidates = vec![
            EventRecord::new(1, "2025-01-06 11:59:00", "u1", "a"),
            EventRecord::new(2, "2025-01-06 11:50:00", "u1", "b"),
            EventRecord::new(3, "2025-01-06 11:59:30", "u1", "c"),
        ];

        let outcome = filter_window(candidates, now, 60);
        let ids: Vec<i64> = outcome.events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(outcome.corrupt.is_empty());
    }

    #[test]
    fn test_filter_window_skips_corrupt_timestamps() {
        let now = start();
        let candidates = vec![
            EventRecord::new(1, "2025-01-06T11:59:00Z", "u1", "iso"),
            EventRecord::new(2, "2025-01-06 11:59:00", "u1", "ok"),
            EventRecord::new(3, "garbage", "u1", "bad"),
        ];

        let outcome = filter_window(candidates, now, 3600);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].id, 2);
        assert_eq!(outcome.corrupt.len(), 2);
        assert_eq!(outcome.corrupt[0].id, 1);
        assert_eq!(outcome.corrupt[1].raw, "garbage");
    }

    #[test]
    fn test_report_excludes_old_events() {
        let (engine, clock, _temp_dir) = create_test_engine();

        engine.log().append("u1", "click").unwrap();
        clock.advance_secs(500);
        let recent = engine.log().append("u1", "purchase").unwrap();

        let events = engine.report("u1", 200).unwrap();
        assert_eq!(events, vec![recent]);
    }

    #[test]
    fn test_report_window_is_inclusive() {
        let (engine, clock, _temp_dir) = create_test_engine();

        let record = engine.log().append("u1", "click").unwrap();
        clock.advance_secs(120);

        assert_eq!(engine.report("u1", 120).unwrap(), vec![record]);
        assert!(engine.report("u1", 119).unwrap().is_empty());
    }

    #[test]
    fn test_report_zero_window_same_second() {
        let (engine, clock, _temp_dir) = create_test_engine();

        engine.log().append("u1", "click").unwrap();
        clock.set(start() + chrono::Duration::milliseconds(400));

        assert_eq!(engine.report("u1", 0).unwrap().len(), 1);
    }

    #[test]
    fn test_report_unknown_user_is_empty() {
        let (engine, _clock, _temp_dir) = create_test_engine();
        engine.log().append("u1", "click").unwrap();

        assert!(engine.report("nonexistent-user", 100).unwrap().is_empty());
    }

    #[test]
    fn test_report_only_considers_requested_user() {
        let (engine, _clock, _temp_dir) = create_test_engine();

        engine.log().append("u1", "click").unwrap();
        engine.log().append("u2", "click").unwrap();
        engine.log().append("u1", "logout").unwrap();

        let events = engine.report("u1", 10).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.userid == "u1"));
    }

    #[test]
    fn test_engine_clock_can_differ_from_log_clock() {
        let (engine, _clock, _temp_dir) = create_test_engine();
        engine.log().append("u1", "click").unwrap();

        let later = Arc::new(ManualClock::new(start() + chrono::Duration::seconds(3600)));
        let engine = ReportEngine::with_clock(Arc::clone(engine.log()), later);

        assert!(engine.report("u1", 60).unwrap().is_empty());
        assert_eq!(engine.report("u1", 3600).unwrap().len(), 1);
    }
}
