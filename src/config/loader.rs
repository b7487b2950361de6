//! Settings Loader
//!
//! Layers built-in defaults, an optional TOML settings file and environment
//! variables through the `config` crate. Environment keys are lower-cased
//! before they reach the builder, which makes `QUEUE_NAME` and `queue_name`
//! the same key.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::{ConfigResult, ConfigurationError};
use super::{ConsumerConfig, Settings};
use crate::constants::{consumer as consumer_defaults, system};

/// Raw, unvalidated view of the configuration sources
#[derive(Debug, Deserialize)]
struct RawSettings {
    queue_connection_string: Option<String>,
    queue_name: Option<String>,
    queue_debug: bool,
    db_connection_string: Option<String>,
    app_name: String,
    app_version: String,
    debug: bool,
    bind_address: String,
    consumer_grace_period_secs: u64,
    consumer_max_wait_secs: u64,
    consumer_backoff_secs: u64,
    consumer_visibility_timeout_secs: u64,
    consumer_batch_size: u32,
}

impl RawSettings {
    fn into_settings(self) -> ConfigResult<Settings> {
        let settings = Settings {
            queue_connection_string: required(
                self.queue_connection_string,
                "queue_connection_string",
            )?,
            queue_name: required(self.queue_name, "queue_name")?,
            queue_debug: self.queue_debug,
            db_connection_string: required(self.db_connection_string, "db_connection_string")?,
            app_name: self.app_name,
            app_version: self.app_version,
            debug: self.debug,
            bind_address: self.bind_address,
            consumer: ConsumerConfig {
                grace_period: Duration::from_secs(self.consumer_grace_period_secs),
                max_wait: Duration::from_secs(self.consumer_max_wait_secs),
                backoff: Duration::from_secs(self.consumer_backoff_secs),
                visibility_timeout: Duration::from_secs(self.consumer_visibility_timeout_secs),
                batch_size: self.consumer_batch_size,
            },
        };

        settings.validate()?;
        Ok(settings)
    }
}

fn required(value: Option<String>, field: &str) -> ConfigResult<String> {
    value.ok_or_else(|| ConfigurationError::missing_required_field(field, "service settings"))
}

/// Builder-style loader; `Settings::load()` uses the defaults
#[derive(Debug, Default)]
pub struct SettingsLoader {
    config_file: Option<PathBuf>,
    environment: Option<HashMap<String, String>>,
    skip_dotenv: bool,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from this TOML file instead of the default location
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Use an explicit variable map instead of the process environment.
    /// This is useful for testing without modifying global environment variables;
    /// `.env` loading is skipped as well.
    pub fn with_environment(mut self, vars: HashMap<String, String>) -> Self {
        self.environment = Some(vars);
        self.skip_dotenv = true;
        self
    }

    pub fn load(self) -> ConfigResult<Settings> {
        if !self.skip_dotenv {
            load_dotenv();
        }

        let vars = normalize_keys(self.environment.unwrap_or_else(process_environment));

        let config_file = self
            .config_file
            .or_else(|| {
                vars.get(&system::CONFIG_FILE_ENV.to_lowercase())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(system::DEFAULT_CONFIG_FILE));

        debug!(
            config_file = %config_file.display(),
            "Loading service settings"
        );

        let config = Config::builder()
            .set_default("queue_debug", false)?
            .set_default("app_name", system::DEFAULT_APP_NAME)?
            .set_default("app_version", system::DEFAULT_APP_VERSION)?
            .set_default("debug", false)?
            .set_default("bind_address", system::DEFAULT_BIND_ADDRESS)?
            .set_default(
                "consumer_grace_period_secs",
                consumer_defaults::DEFAULT_GRACE_PERIOD_SECS as i64,
            )?
            .set_default(
                "consumer_max_wait_secs",
                consumer_defaults::DEFAULT_MAX_WAIT_SECS as i64,
            )?
            .set_default(
                "consumer_backoff_secs",
                consumer_defaults::DEFAULT_BACKOFF_SECS as i64,
            )?
            .set_default(
                "consumer_visibility_timeout_secs",
                consumer_defaults::DEFAULT_VISIBILITY_TIMEOUT_SECS as i64,
            )?
            .set_default(
                "consumer_batch_size",
                i64::from(consumer_defaults::DEFAULT_BATCH_SIZE),
            )?
            .add_source(
                File::from(config_file.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().source(Some(vars.into_iter().collect())))
            .build()?;

        let raw: RawSettings = config.try_deserialize()?;
        raw.into_settings()
    }
}

/// What happened when looking for a `.env` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    Missing,
    Unreadable(String),
}

/// Load `.env` from the working directory or its parents.
///
/// A missing file is expected; an unreadable or malformed one is logged and skipped.
pub fn load_dotenv() -> DotenvStatus {
    report_dotenv(dotenvy::dotenv())
}

fn report_dotenv(result: Result<PathBuf, dotenvy::Error>) -> DotenvStatus {
    match result {
        Ok(path) => {
            debug!(path = %path.display(), "Loaded .env file");
            DotenvStatus::Loaded(path)
        }
        Err(e) if e.not_found() => DotenvStatus::Missing,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable .env file");
            DotenvStatus::Unreadable(e.to_string())
        }
    }
}

/// Process environment, skipping variables that are not valid unicode
fn process_environment() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

fn normalize_keys(vars: HashMap<String, String>) -> HashMap<String, String> {
    vars.into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect()
}
