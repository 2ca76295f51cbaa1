//! Event record types
//!
//! An `EventRecord` is the only entity the service persists. Records are
//! created once by the event log and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A durably stored event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Store-assigned, strictly increasing ID
    pub id: i64,

    /// UTC recording time in `YYYY-MM-DD HH:MM:SS` form
    #[serde(rename = "eventtimestamputc")]
    pub timestamp: String,

    /// Opaque user identifier
    pub userid: String,

    /// Opaque event label
    pub eventname: String,
}

impl EventRecord {
    /// Build a record from its stored columns
    pub fn new(
        id: i64,
        timestamp: impl Into<String>,
        userid: impl Into<String>,
        eventname: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp: timestamp.into(),
            userid: userid.into(),
            eventname: eventname.into(),
        }
    }
}

/// A client-submitted event, before the store stamps it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub userid: String,
    pub eventname: String,
}

impl NewEvent {
    pub fn new(userid: impl Into<String>, eventname: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            eventname: eventname.into(),
        }
    }
}
