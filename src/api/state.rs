//! Shared application state for HTTP handlers

use std::sync::Arc;

use crate::event_store::EventLog;
use crate::report::ReportEngine;

/// Handles shared by every request
pub struct AppState {
    /// The event log, used for ingestion and plain reads
    pub log: Arc<EventLog>,

    /// Windowed reports over the same log
    pub reports: ReportEngine,
}

impl AppState {
    /// Create state around an opened event log
    pub fn new(log: Arc<EventLog>) -> Self {
        let reports = ReportEngine::new(Arc::clone(&log));
        Self { log, reports }
    }
}
