//! Utility functions and helpers
//!
//! This module contains the clock abstraction and timestamp helpers.

pub mod time;

pub use time::{
    format_timestamp, parse_timestamp, Clock, SystemClock, TimestampError, TIMESTAMP_FORMAT,
};
