//! Event Analytics Service
//!
//! An event ingestion and query service: clients submit `(userid, eventname)`
//! pairs, the service timestamps and durably records them in an append-only
//! SQLite log, and clients later retrieve all events or a time-windowed
//! subset per user.
//!
//! # Features
//!
//! - **Append-only log**: Store-assigned ids and timestamps, never mutated
//! - **Concurrent writers**: Serialized by SQLite's own write lock
//! - **Recency reports**: Inclusive `lastseconds` window per user
//! - **Injectable clock**: Deterministic time in tests
//!
//! # Modules
//!
//! - `types`: Core data structures (EventRecord, NewEvent)
//! - `event_store`: Durable event log
//! - `report`: Recency-window report engine
//! - `validation`: Request field rules
//! - `api`: Axum HTTP endpoints
//! - `config`: Environment-based configuration
//! - `logging`: Tracing subscriber setup
//! - `utils`: Clock and timestamp helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use event_analytics::{EventLog, EventLogConfig, ReportEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let log = Arc::new(EventLog::open(EventLogConfig::new("analytics.db"))?);
//!     log.append("user123", "level_completed")?;
//!
//!     let reports = ReportEngine::new(log);
//!     let recent = reports.report("user123", 200)?;
//!     println!("{} recent events", recent.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod event_store;
pub mod logging;
pub mod report;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use api::AppState;
pub use config::ServiceConfig;
pub use event_store::{EventLog, EventLogConfig, EventLogError, EventLogResult};
pub use report::{CorruptRecord, ReportEngine, ReportOutcome};
pub use types::{EventRecord, NewEvent, ServiceResult};
pub use utils::time::{Clock, SystemClock};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
