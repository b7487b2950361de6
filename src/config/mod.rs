//! # Service Configuration
//!
//! Settings for the booking service, loaded from built-in defaults, an optional
//! TOML file, a `.env` file and process environment variables (highest
//! priority). Environment keys are case-insensitive.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use booking_service::config::Settings;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! println!("consuming from {}", settings.queue_name);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::constants::consumer as consumer_defaults;

pub use error::{ConfigResult, ConfigurationError};

/// Application settings
#[derive(Clone)]
pub struct Settings {
    /// Connection string of the queue endpoint (secret)
    pub queue_connection_string: String,
    /// Queue to receive messages from
    pub queue_name: String,
    /// Enable debug logging for the queue driver stack
    pub queue_debug: bool,
    /// Connection string of the booking database (secret)
    pub db_connection_string: String,
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    /// HTTP listen address
    pub bind_address: String,
    /// Receive loop tuning
    pub consumer: ConsumerConfig,
}

// Connection strings carry credentials; never print them.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("queue_connection_string", &"[REDACTED]")
            .field("queue_name", &self.queue_name)
            .field("queue_debug", &self.queue_debug)
            .field("db_connection_string", &"[REDACTED]")
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .field("debug", &self.debug)
            .field("bind_address", &self.bind_address)
            .field("consumer", &self.consumer)
            .finish()
    }
}

impl Settings {
    /// Load settings from `.env`, the optional settings file and the process environment
    pub fn load() -> ConfigResult<Self> {
        loader::SettingsLoader::new().load()
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            ConfigurationError::invalid_value(
                "bind_address",
                self.bind_address.clone(),
                format!("not a socket address: {e}"),
            )
        })
    }

    /// Check invariants the deserializer cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("queue_connection_string", &self.queue_connection_string),
            ("queue_name", &self.queue_name),
            ("db_connection_string", &self.db_connection_string),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(
                    field,
                    "",
                    "must not be empty",
                ));
            }
        }

        self.socket_addr()?;
        self.consumer.validate()
    }
}

/// Timing and batching knobs of the queue consumer
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerConfig {
    /// How long `stop()` waits for a cooperative exit before aborting the loop
    pub grace_period: Duration,
    /// Upper bound of one receive session
    pub max_wait: Duration,
    /// Fixed sleep after a failed receive, handler or acknowledgment
    pub backoff: Duration,
    /// Redelivery delay of unacknowledged messages
    pub visibility_timeout: Duration,
    /// Messages fetched per poll
    pub batch_size: u32,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(consumer_defaults::DEFAULT_GRACE_PERIOD_SECS),
            max_wait: Duration::from_secs(consumer_defaults::DEFAULT_MAX_WAIT_SECS),
            backoff: Duration::from_secs(consumer_defaults::DEFAULT_BACKOFF_SECS),
            visibility_timeout: Duration::from_secs(
                consumer_defaults::DEFAULT_VISIBILITY_TIMEOUT_SECS,
            ),
            batch_size: consumer_defaults::DEFAULT_BATCH_SIZE,
        }
    }
}

impl ConsumerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "consumer_batch_size",
                "0",
                "must be at least 1",
            ));
        }
        if self.visibility_timeout.as_secs() > i32::MAX as u64 {
            return Err(ConfigurationError::invalid_value(
                "consumer_visibility_timeout_secs",
                self.visibility_timeout.as_secs().to_string(),
                "exceeds the queue's supported range",
            ));
        }
        Ok(())
    }
}
