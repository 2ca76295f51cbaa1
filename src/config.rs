//! Service configuration from environment variables
//!
//! | Variable                         | Default        |
//! |----------------------------------|----------------|
//! | `ANALYTICS_DB_PATH`              | `analytics.db` |
//! | `ANALYTICS_BIND_ADDR`            | `0.0.0.0:8000` |
//! | `ANALYTICS_BUSY_TIMEOUT_MS`      | `5000`         |
//! | `ANALYTICS_MAX_IDLE_CONNECTIONS` | `8`            |
//! | `ANALYTICS_LOG_FORMAT`           | `pretty`       |

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::event_store::EventLogConfig;

pub const DB_PATH_VAR: &str = "ANALYTICS_DB_PATH";
pub const BIND_ADDR_VAR: &str = "ANALYTICS_BIND_ADDR";
pub const BUSY_TIMEOUT_VAR: &str = "ANALYTICS_BUSY_TIMEOUT_MS";
pub const MAX_IDLE_VAR: &str = "ANALYTICS_MAX_IDLE_CONNECTIONS";
pub const LOG_FORMAT_VAR: &str = "ANALYTICS_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Everything the server binary needs at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub event_log: EventLogConfig,
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_lookup(&current_dir, |key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// Relative database paths are resolved against `base_dir`.
    pub fn from_lookup<F>(base_dir: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EventLogConfig::default();

        let db_path = match lookup(DB_PATH_VAR) {
            Some(path) if Path::new(&path).is_absolute() => PathBuf::from(path),
            Some(path) => base_dir.join(path),
            None => base_dir.join(&defaults.db_path),
        };

        let busy_timeout = match lookup(BUSY_TIMEOUT_VAR) {
            Some(raw) => Duration::from_millis(parse_var(BUSY_TIMEOUT_VAR, raw)?),
            None => defaults.busy_timeout,
        };

        let max_idle_connections = match lookup(MAX_IDLE_VAR) {
            Some(raw) => parse_var(MAX_IDLE_VAR, raw)?,
            None => defaults.max_idle_connections,
        };

        let bind_addr = parse_var(
            BIND_ADDR_VAR,
            lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => parse_var(LOG_FORMAT_VAR, raw)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            event_log: EventLogConfig::new(db_path)
                .with_busy_timeout(busy_timeout)
                .with_max_idle_connections(max_idle_connections),
            bind_addr,
            log_format,
        })
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}
