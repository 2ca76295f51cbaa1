//! Event Analytics Server - Binary Entry Point
//!
//! This is the main entry point for the analytics-server binary.

use std::sync::Arc;

use event_analytics::api::{serve, AppState};
use event_analytics::config::ServiceConfig;
use event_analytics::event_store::EventLog;
use event_analytics::logging;
use event_analytics::types::ServiceResult;

#[tokio::main]
async fn main() -> ServiceResult<()> {
    let config = ServiceConfig::from_env()?;
    logging::init(config.log_format)?;

    tracing::info!(
        version = event_analytics::VERSION,
        db = %config.event_log.db_path.display(),
        "starting analytics server"
    );

    // Schema is created here, before the first request is accepted
    let log = Arc::new(EventLog::open(config.event_log.clone())?);
    let state = Arc::new(AppState::new(log));

    serve(config.bind_addr, state).await?;
    Ok(())
}
