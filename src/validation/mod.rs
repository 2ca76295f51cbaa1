//! Request validation
//!
//! The event log assumes non-empty `userid` and `eventname`; requests are
//! checked here before they reach it. Structural problems (missing field,
//! non-string value) are already rejected while decoding the JSON body.

mod rules;

pub use rules::{validate_new_event, validate_userid, ValidationError};
