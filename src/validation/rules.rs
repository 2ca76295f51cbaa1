//! Field rules for incoming events and report queries

use thiserror::Error;

use crate::types::NewEvent;

/// Malformed client input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{0}' must be a non-empty string")]
    EmptyField(&'static str),
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

/// Check a user identifier used for lookups and reports
pub fn validate_userid(userid: &str) -> Result<(), ValidationError> {
    require_non_empty("userid", userid)
}

/// Check an event before it is appended
pub fn validate_new_event(event: &NewEvent) -> Result<(), ValidationError> {
    validate_userid(&event.userid)?;
    require_non_empty("eventname", &event.eventname)
}
