//! # Service Constants
//!
//! Defaults and fixed names that define the operational boundaries of the
//! booking service: consumer timings, health reporting and configuration keys.

use serde::{Deserialize, Serialize};

/// Queue consumer timing defaults
pub mod consumer {
    /// How long `stop()` waits for the receive loop before aborting it
    pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 10;

    /// Maximum wait of a single receive session before it ends and the
    /// running flag is re-checked
    pub const DEFAULT_MAX_WAIT_SECS: u64 = 5;

    /// Flat backoff after any receive, handler or acknowledgment error
    pub const DEFAULT_BACKOFF_SECS: u64 = 5;

    /// Visibility timeout applied to received pgmq messages; an unacknowledged
    /// message becomes visible (is redelivered) once it elapses
    pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: u64 = 30;

    /// Messages fetched per pgmq poll
    pub const DEFAULT_BATCH_SIZE: u32 = 10;

    /// Interval between pgmq polls inside one receive session
    pub const POLL_INTERVAL_MILLIS: u64 = 250;
}

/// Application identity defaults
pub mod system {
    pub const DEFAULT_APP_NAME: &str = "grooming-booking-service";

    pub const DEFAULT_APP_VERSION: &str = "0.1.0";

    pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

    /// Optional settings file read from the working directory
    pub const DEFAULT_CONFIG_FILE: &str = "booking-service.toml";

    /// Environment variable overriding the settings file location
    pub const CONFIG_FILE_ENV: &str = "BOOKING_CONFIG_FILE";

    /// Environment variable enabling JSON file logging into the given directory
    pub const LOG_DIR_ENV: &str = "BOOKING_LOG_DIR";

    /// Log targets belonging to the queue driver stack
    pub const QUEUE_DRIVER_TARGETS: &[&str] = &["pgmq", "sqlx"];
}

/// Health indicator reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
        assert_eq!(HealthStatus::Healthy.to_string(), "healthy");
    }
}
