//! # Booking Service Server
//!
//! Runs the health API and the queue consumer until Ctrl+C or SIGTERM.
//!
//! ```bash
//! QUEUE_CONNECTION_STRING=postgresql://localhost/queues \
//! QUEUE_NAME=booking-events \
//! DB_CONNECTION_STRING=postgresql://localhost/bookings \
//! cargo run --bin booking-server
//! ```

use tokio::signal;
use tracing::{error, info};

use booking_service::bootstrap::ServiceBootstrap;
use booking_service::config::Settings;
use booking_service::logging::{self, LoggingOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init_tracing(&LoggingOptions::default());
            error!(error = %e, "Failed to load settings");
            return Err(e.into());
        }
    };

    logging::init_tracing(&LoggingOptions::from(&settings));

    info!("🚀 Starting {}...", settings.app_name);
    info!("   Version: {}", settings.app_version);
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );
    info!("   Queue: {}", settings.queue_name);

    let handle = ServiceBootstrap::bootstrap(settings)
        .await
        .map_err(|e| format!("Failed to bootstrap booking service: {e}"))?;

    info!("🎉 Booking service started on {}", handle.local_addr());
    info!("   Press Ctrl+C to shutdown gracefully");

    handle.serve(shutdown_signal()).await?;

    info!("👋 Booking service shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📡 Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("📡 Received SIGTERM signal");
        },
    }

    info!("🛑 Shutdown signal received, initiating graceful shutdown...");
}
