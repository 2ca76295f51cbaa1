//! Event Log - append-only SQLite store
//!
//! The EventLog owns the `events` table. It assigns ids and timestamps
//! itself, inside an immediate transaction, so the id order always matches
//! the commit order no matter how many writers share the database file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use thiserror::Error;
use tracing::{debug, info};

use crate::types::{EventRecord, NewEvent};
use crate::utils::time::{format_timestamp, Clock, SystemClock};

const CREATE_EVENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        eventtimestamputc TEXT NOT NULL,
        userid TEXT NOT NULL,
        eventname TEXT NOT NULL
    )
"#;

const INSERT_EVENT: &str =
    "INSERT INTO events (eventtimestamputc, userid, eventname) VALUES (?1, ?2, ?3)";

const SELECT_ALL: &str =
    "SELECT id, eventtimestamputc, userid, eventname FROM events ORDER BY id ASC";

const SELECT_BY_USER: &str =
    "SELECT id, eventtimestamputc, userid, eventname FROM events WHERE userid = ?1 ORDER BY id ASC";

/// Configuration for the EventLog
#[derive(Debug, Clone)]
pub struct EventLogConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// How long a connection waits on a locked database before failing
    pub busy_timeout: Duration,
    /// Upper bound on connections kept open between operations
    pub max_idle_connections: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("analytics.db"),
            busy_timeout: Duration::from_millis(5000),
            max_idle_connections: 8,
        }
    }
}

impl EventLogConfig {
    /// Create config with a custom database path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn with_max_idle_connections(mut self, max_idle_connections: usize) -> Self {
        self.max_idle_connections = max_idle_connections;
        self
    }

    /// Get the database path
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Result type for EventLog operations
pub type EventLogResult<T> = Result<T, EventLogError>;

/// Storage failures: the persistence layer could not complete a read or write
#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Append-only, durable log of event records
pub struct EventLog {
    config: EventLogConfig,
    clock: Arc<dyn Clock>,
    /// Connections not currently in use by an operation
    idle: Mutex<Vec<Connection>>,
}

impl EventLog {
    /// Open (creating if needed) the log with the wall clock
    pub fn open(config: EventLogConfig) -> EventLogResult<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Open the log with an explicit time source
    pub fn open_with_clock(config: EventLogConfig, clock: Arc<dyn Clock>) -> EventLogResult<Self> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let log = Self {
            config,
            clock,
            idle: Mutex::new(Vec::new()),
        };

        let conn = log.connect()?;
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.execute_batch(CREATE_EVENTS_TABLE)?;
        log.checkin(conn);

        info!(
            path = %log.config.db_path.display(),
            journal_mode = %journal_mode,
            "event log opened"
        );
        Ok(log)
    }

    /// Get the configuration
    pub fn config(&self) -> &EventLogConfig {
        &self.config
    }

    /// Get the time source used to stamp new records
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Stamp and durably append one event
    ///
    /// The timestamp is taken after the write lock is acquired, so
    /// timestamps never run backwards relative to ids on a monotonic clock.
    pub fn append(&self, userid: &str, eventname: &str) -> EventLogResult<EventRecord> {
        let record = self.with_connection(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let timestamp = format_timestamp(self.clock.now_truncated());

            tx.prepare_cached(INSERT_EVENT)?
                .execute(params![timestamp, userid, eventname])?;
            let id = tx.last_insert_rowid();
            tx.commit()?;

            Ok(EventRecord::new(id, timestamp, userid, eventname))
        })?;

        debug!(id = record.id, userid, eventname, "event appended");
        Ok(record)
    }

    /// Append a client-submitted event
    pub fn append_event(&self, event: &NewEvent) -> EventLogResult<EventRecord> {
        self.append(&event.userid, &event.eventname)
    }

    /// All records in ascending id order
    pub fn read_all(&self) -> EventLogResult<Vec<EventRecord>> {
        let records = self.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(SELECT_ALL)?;
            let rows = stmt.query_map([], record_from_row)?;
            let records = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })?;

        debug!(count = records.len(), "read all events");
        Ok(records)
    }

    /// Records whose userid matches exactly, in ascending id order
    pub fn read_by_user(&self, userid: &str) -> EventLogResult<Vec<EventRecord>> {
        let records = self.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(SELECT_BY_USER)?;
            let rows = stmt.query_map(params![userid], record_from_row)?;
            let records = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })?;

        debug!(userid, count = records.len(), "read events for user");
        Ok(records)
    }

    #[cfg(test)]
    fn idle_connections(&self) -> usize {
        self.idle.lock().len()
    }

    fn connect(&self) -> EventLogResult<Connection> {
        let conn = Connection::open(&self.config.db_path)?;
        conn.busy_timeout(self.config.busy_timeout)?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        Ok(conn)
    }

    fn checkin(&self, conn: Connection) {
        let mut idle = self.idle.lock();
        if idle.len() < self.config.max_idle_connections {
            idle.push(conn);
        }
    }

    /// Run one unit of work on a dedicated connection
    ///
    /// A connection that saw an error is dropped rather than reused.
    fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> EventLogResult<T>,
    ) -> EventLogResult<T> {
        let cached = self.idle.lock().pop();
        let mut conn = match cached {
            Some(conn) => conn,
            None => self.connect()?,
        };

        let result = op(&mut conn)?;
        self.checkin(conn);
        Ok(result)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<EventRecord> {
    Ok(EventRecord {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        userid: row.get(2)?,
        eventname: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::ManualClock;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_log() -> (EventLog, Arc<ManualClock>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = EventLogConfig::new(temp_dir.path().join("analytics.db"));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap(),
        ));

        let log = EventLog::open_with_clock(config, clock.clone()).unwrap();
        (log, clock, temp_dir)
    }

    #[test]
    fn test_append_assigns_id_and_timestamp() {
        let (log, clock, _temp_dir) = create_test_log();

        let first = log.append("u1", "click").unwrap();
        clock.advance_secs(3);
        let second = log.append("u1", "purchase").unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(first.timestamp, "2025-01-06 12:00:00");
        assert_eq!(second.id, 2);
        assert_eq!(second.timestamp, "2025-01-06 12:00:03");
        assert_eq!(second.eventname, "purchase");
    }

    #[test]
    fn test_append_truncates_subseconds() {
        let (log, clock, _temp_dir) = create_test_log();
        clock.set(
            Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 59).unwrap()
                + chrono::Duration::milliseconds(999),
        );

        let record = log.append("u1", "click").unwrap();
        assert_eq!(record.timestamp, "2025-01-06 12:00:59");
    }

    #[test]
    fn test_read_all_in_insertion_order() {
        let (log, _clock, _temp_dir) = create_test_log();

        log.append("u1", "click").unwrap();
        log.append("u1", "purchase").unwrap();
        log.append("u2", "click").unwrap();

        let events = log.read_all().unwrap();
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(events[2].userid, "u2");
    }

    #[test]
    fn test_read_by_user_is_exact_and_case_sensitive() {
        let (log, _clock, _temp_dir) = create_test_log();

        log.append("u1", "click").unwrap();
        log.append("U1", "click").unwrap();
        log.append("u10", "click").unwrap();
        log.append("u1", "logout").unwrap();

        let events = log.read_by_user("u1").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, 1);
        assert_eq!(events[1].id, 4);
        assert!(log.read_by_user("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_empty_log_reads_empty() {
        let (log, _clock, _temp_dir) = create_test_log();
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_records_survive_reopen() {
        let (log, clock, temp_dir) = create_test_log();
        log.append("u1", "click").unwrap();
        log.append("u2", "signup").unwrap();
        let config = log.config().clone();
        drop(log);

        let reopened = EventLog::open_with_clock(config, clock).unwrap();
        assert_eq!(reopened.read_all().unwrap().len(), 2);

        let next = reopened.append("u3", "purchase").unwrap();
        assert_eq!(next.id, 3);
        drop(temp_dir);
    }

    #[test]
    fn test_idle_connections_are_capped() {
        let temp_dir = TempDir::new().unwrap();
        let config = EventLogConfig::new(temp_dir.path().join("analytics.db"))
            .with_max_idle_connections(1);
        let log = EventLog::open(config).unwrap();

        log.append("u1", "click").unwrap();
        log.read_all().unwrap();
        assert_eq!(log.idle_connections(), 1);
    }

    #[test]
    fn test_open_fails_on_directory_path() {
        let temp_dir = TempDir::new().unwrap();
        let config = EventLogConfig::new(temp_dir.path());
        assert!(EventLog::open(config).is_err());
    }

    #[test]
    fn test_append_event_uses_payload_fields() {
        let (log, _clock, _temp_dir) = create_test_log();
        let record = log
            .append_event(&NewEvent::new("user123", "level_completed"))
            .unwrap();

        assert_eq!(record.userid, "user123");
        assert_eq!(record.eventname, "level_completed");
    }
}
