//! # Service Bootstrap
//!
//! Wires the booking service together: the queue consumer with its pgmq
//! backend and the HTTP server. [`ServiceBootstrap::bootstrap`] starts the
//! consumer and binds the listener; [`ServiceHandle::serve`] runs the server
//! until the shutdown future resolves and then stops the consumer.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Settings;
use crate::error::BookingResult;
use crate::messaging::{
    ConsumerState, LoggingMessageHandler, MessageHandler, PgmqConnector, QueueConnector,
    QueueConsumer,
};
use crate::web::{self, AppState};

/// Running service: a started consumer plus a bound, not yet serving, listener
pub struct ServiceHandle {
    consumer: QueueConsumer,
    listener: TcpListener,
    app: Router,
    local_addr: SocketAddr,
}

impl std::fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("consumer", &self.consumer)
            .field("local_addr", &self.local_addr)
            .finish()
    }
}

impl ServiceHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn consumer_state(&self) -> ConsumerState {
        self.consumer.state()
    }

    /// Serve HTTP until `shutdown` resolves, then stop the consumer.
    ///
    /// The consumer is stopped even when the server fails.
    pub async fn serve<F>(mut self, shutdown: F) -> BookingResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(address = %self.local_addr, "HTTP server listening");

        let served = axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await;

        if let Err(e) = &served {
            error!(error = %e, "HTTP server failed");
        }

        info!("Stopping queue consumer");
        self.consumer.stop().await;

        served?;
        info!("Service shutdown complete");
        Ok(())
    }
}

pub struct ServiceBootstrap;

impl ServiceBootstrap {
    /// Start the service with the pgmq backend and the logging handler
    pub async fn bootstrap(settings: Settings) -> BookingResult<ServiceHandle> {
        let connector: Arc<dyn QueueConnector> = Arc::new(PgmqConnector::new(&settings.consumer));
        let handler: Arc<dyn MessageHandler> = Arc::new(LoggingMessageHandler::new());
        Self::bootstrap_with(settings, connector, handler).await
    }

    /// Start the service with an explicit queue backend and handler
    pub async fn bootstrap_with(
        settings: Settings,
        connector: Arc<dyn QueueConnector>,
        handler: Arc<dyn MessageHandler>,
    ) -> BookingResult<ServiceHandle> {
        info!(
            app_name = %settings.app_name,
            app_version = %settings.app_version,
            queue = %settings.queue_name,
            "Bootstrapping booking service"
        );

        let address = settings.socket_addr()?;

        let mut consumer = QueueConsumer::from_settings(&settings, connector, handler);
        consumer.start().await?;

        let listener = match TcpListener::bind(address).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(address = %address, error = %e, "Failed to bind HTTP listener");
                consumer.stop().await;
                return Err(e.into());
            }
        };
        let local_addr = listener.local_addr()?;

        let app = web::create_app(Arc::new(AppState::from(&settings)));

        info!(
            address = %local_addr,
            consumer_id = %consumer.consumer_id(),
            "Booking service bootstrapped"
        );
        Ok(ServiceHandle {
            consumer,
            listener,
            app,
            local_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::ConsumerConfig;
    use crate::error::BookingError;
    use crate::test_helpers::{MockQueue, RecordingHandler};

    fn test_settings() -> Settings {
        Settings {
            queue_connection_string: "postgresql://localhost/queue".to_string(),
            queue_name: "booking-events".to_string(),
            queue_debug: false,
            db_connection_string: "postgresql://localhost/bookings".to_string(),
            app_name: "grooming-booking-service".to_string(),
            app_version: "0.1.0".to_string(),
            debug: false,
            bind_address: "127.0.0.1:0".to_string(),
            consumer: ConsumerConfig {
                max_wait: Duration::from_millis(50),
                backoff: Duration::from_millis(50),
                ..ConsumerConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn test_bootstrap_starts_consumer_and_serve_stops_it() {
        let queue = MockQueue::new();
        let handler = Arc::new(RecordingHandler::new(&queue));

        let handle = ServiceBootstrap::bootstrap_with(test_settings(), queue.connector(), handler)
            .await
            .unwrap();

        assert_eq!(handle.consumer_state(), ConsumerState::Running);
        assert_ne!(handle.local_addr().port(), 0);
        assert_eq!(queue.connect_attempts(), 1);

        handle.serve(async {}).await.unwrap();
        assert_eq!(queue.close_calls(), 1);
    }

    #[tokio::test]
    async fn test_consumer_start_failure_aborts_bootstrap() {
        let queue = MockQueue::new();
        queue.fail_connect(true);
        let handler = Arc::new(RecordingHandler::new(&queue));

        let result =
            ServiceBootstrap::bootstrap_with(test_settings(), queue.connector(), handler).await;

        assert!(matches!(result, Err(BookingError::Messaging(_))));
    }

    #[tokio::test]
    async fn test_invalid_bind_address_fails_before_connecting() {
        let queue = MockQueue::new();
        let handler = Arc::new(RecordingHandler::new(&queue));
        let settings = Settings {
            bind_address: "not-an-address".to_string(),
            ..test_settings()
        };

        let result = ServiceBootstrap::bootstrap_with(settings, queue.connector(), handler).await;

        assert!(matches!(result, Err(BookingError::Configuration(_))));
        assert_eq!(queue.connect_attempts(), 0);
    }
}
