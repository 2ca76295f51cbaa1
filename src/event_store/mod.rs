//! Event Store Module
//!
//! This module provides the durable, append-only event log:
//! - `EventLog`: SQLite-backed store with one insert and two read shapes
//! - `EventLogConfig`: database location and connection tuning
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌──────────┐    ┌──────────────────┐    ┌──────────────────────┐
//! │ append() │───►│ BEGIN IMMEDIATE  │───►│ stamp, INSERT, COMMIT│
//! └──────────┘    │ (SQLite lock)    │    │ id = last_insert_rowid│
//!                 └──────────────────┘    └──────────────────────┘
//!
//! Read Path:
//! ┌──────────────────────────┐    ┌──────────────────────┐
//! │ read_all / read_by_user  │───►│ SELECT ... ORDER BY id│
//! └──────────────────────────┘    └──────────────────────┘
//! ```

mod store;

pub use store::{EventLog, EventLogConfig, EventLogError, EventLogResult};
