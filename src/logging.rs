//! # Structured Logging Module
//!
//! Environment-aware console logging built on the tracing ecosystem, with an
//! optional JSON file sink for deployments that ship log files.
//!
//! - Console output is TTY-aware (ANSI colors only on a terminal).
//! - `LOG_LEVEL` or `RUST_LOG` take precedence and are used verbatim as the
//!   filter; otherwise the level follows the `debug` setting and the deployment
//!   environment (`BOOKING_ENV` / `APP_ENV`).
//! - Without an explicit filter, queue driver targets (`pgmq`, `sqlx`) stay at
//!   `warn` unless queue debugging is requested.
//! - Setting `BOOKING_LOG_DIR` adds a JSON layer writing
//!   `<env>.<pid>.<timestamp>.log` into that directory.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::Utc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Settings;
use crate::constants::system;

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();
/// Keeps the non-blocking file writer flushing for the lifetime of the process
static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging knobs derived from settings
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Raise the default level to debug
    pub debug: bool,
    /// Let queue driver targets log at debug instead of warn
    pub queue_debug: bool,
}

impl From<&Settings> for LoggingOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            debug: settings.debug,
            queue_debug: settings.queue_debug,
        }
    }
}

/// Initialize console logging once per process.
///
/// Later calls are no-ops, and an already installed global subscriber is left
/// in place.
pub fn init_tracing(options: &LoggingOptions) {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let directives = resolve_filter_directives(
            explicit_log_filter(),
            &environment,
            options.debug,
            options.queue_debug,
        );
        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(use_ansi)
            .with_filter(EnvFilter::new(&directives));

        let log_dir = std::env::var(system::LOG_DIR_ENV).ok().map(PathBuf::from);
        let file_layer = log_dir.as_ref().map(|dir| {
            let file_name = format!(
                "{}.{}.{}.log",
                environment,
                std::process::id(),
                Utc::now().format("%Y%m%d_%H%M%S")
            );
            let (file_writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let _ = FILE_WRITER_GUARD.set(guard);

            fmt::layer()
                .with_writer(file_writer)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(EnvFilter::new(&directives))
        });

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
            return;
        }

        tracing::info!(
            environment = %environment,
            ansi_colors = use_ansi,
            filter = %directives,
            log_dir = ?log_dir,
            "Console logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("BOOKING_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Operator-supplied filter from `LOG_LEVEL`, then `RUST_LOG`
fn explicit_log_filter() -> Option<String> {
    ["LOG_LEVEL", "RUST_LOG"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// An explicit filter wins unchanged; otherwise derive a level and cap the drivers
fn resolve_filter_directives(
    explicit: Option<String>,
    environment: &str,
    debug: bool,
    queue_debug: bool,
) -> String {
    if let Some(filter) = explicit.filter(|value| !value.trim().is_empty()) {
        return filter;
    }

    let base_level = if debug {
        "debug"
    } else {
        default_level_for(environment)
    };
    build_filter_directives(base_level, queue_debug)
}

fn default_level_for(environment: &str) -> &'static str {
    match environment {
        "test" | "development" => "debug",
        _ => "info",
    }
}

/// Combine the base level with per-target caps for the queue driver stack
fn build_filter_directives(base_level: &str, queue_debug: bool) -> String {
    let driver_level = if queue_debug { "debug" } else { "warn" };
    let mut directives = vec![base_level.to_string()];
    directives.extend(
        system::QUEUE_DRIVER_TARGETS
            .iter()
            .map(|target| format!("{target}={driver_level}")),
    );
    directives.join(",")
}
