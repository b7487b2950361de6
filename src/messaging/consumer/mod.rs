//! # Queue Consumer
//!
//! Background ingestion of queue messages with an explicit start/stop
//! lifecycle.
//!
//! `start()` opens a connection to the queue endpoint and spawns the receive
//! loop. The loop repeatedly opens a bounded-wait receive session, hands each
//! message to the [`MessageHandler`] and acknowledges it once the handler
//! succeeded (at-least-once delivery). Any receive, handler or acknowledgment
//! error is logged and followed by a flat backoff before the next session.
//!
//! `stop()` clears the shared running flag, waits up to the grace period for
//! the loop to finish its current unit of work, aborts it otherwise, then
//! closes the connection. It never fails.
//!
//! Both operations take `&mut self`: the host drives them sequentially.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde::Serialize;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::errors::MessagingResult;
use super::traits::{MessageHandler, QueueConnection, QueueConnector};
use crate::config::{ConsumerConfig, Settings};


/// Lifecycle states of a [`QueueConsumer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for ConsumerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsumerState::Stopped => "stopped",
            ConsumerState::Starting => "starting",
            ConsumerState::Running => "running",
            ConsumerState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// How a call to [`QueueConsumer::stop`] ended the receive task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No receive task was active
    NotStarted,
    /// The task exited within the grace period
    Drained,
    /// The grace period elapsed and the task was aborted
    Cancelled,
}

/// Owns the receive task and the connection to the queue endpoint
pub struct QueueConsumer {
    consumer_id: Uuid,
    connector: Arc<dyn QueueConnector>,
    handler: Arc<dyn MessageHandler>,
    connection_string: String,
    queue_name: String,
    config: ConsumerConfig,
    state: ConsumerState,
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
    connection: Option<Arc<dyn QueueConnection>>,
}

impl fmt::Debug for QueueConsumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueConsumer")
            .field("consumer_id", &self.consumer_id)
            .field("queue_name", &self.queue_name)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("has_task", &self.task.is_some())
            .field("has_connection", &self.connection.is_some())
            .finish()
    }
}

impl QueueConsumer {
    pub fn new(
        connector: Arc<dyn QueueConnector>,
        handler: Arc<dyn MessageHandler>,
        connection_string: impl Into<String>,
        queue_name: impl Into<String>,
        config: ConsumerConfig,
    ) -> Self {
        let consumer_id = Uuid::new_v4();
        let queue_name = queue_name.into();

        debug!(
            consumer_id = %consumer_id,
            queue = %queue_name,
            grace_period_ms = config.grace_period.as_millis(),
            "Creating QueueConsumer"
        );

        Self {
            consumer_id,
            connector,
            handler,
            connection_string: connection_string.into(),
            queue_name,
            config,
            state: ConsumerState::Stopped,
            running: Arc::new(AtomicBool::new(false)),
            task: None,
            connection: None,
        }
    }

    /// Build a consumer for the queue named in the settings
    pub fn from_settings(
        settings: &Settings,
        connector: Arc<dyn QueueConnector>,
        handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self::new(
            connector,
            handler,
            settings.queue_connection_string.clone(),
            settings.queue_name.clone(),
            settings.consumer.clone(),
        )
    }

    /// Connect to the queue endpoint and launch the receive loop.
    ///
    /// A no-op (with a warning) when already started. Connection failures are
    /// returned and leave the consumer stopped.
    pub async fn start(&mut self) -> MessagingResult<()> {
        if matches!(self.state, ConsumerState::Starting | ConsumerState::Running) {
            warn!(consumer_id = %self.consumer_id, "Queue consumer is already running");
            return Ok(());
        }

        info!(
            consumer_id = %self.consumer_id,
            queue = %self.queue_name,
            "Starting queue consumer"
        );
        self.state = ConsumerState::Starting;

        let connection = match self.connector.connect(&self.connection_string).await {
            Ok(connection) => connection,
            Err(e) => {
                self.state = ConsumerState::Stopped;
                error!(
                    consumer_id = %self.consumer_id,
                    error = %e,
                    "Failed to connect to queue endpoint"
                );
                return Err(e);
            }
        };

        // Raised before spawning so the loop's first check sees it.
        self.running.store(true, Ordering::SeqCst);

        let receive_loop = ReceiveLoop {
            consumer_id: self.consumer_id,
            connection: Arc::clone(&connection),
            handler: Arc::clone(&self.handler),
            queue_name: self.queue_name.clone(),
            max_wait: self.config.max_wait,
            backoff: self.config.backoff,
            running: Arc::clone(&self.running),
        };

        self.task = Some(tokio::spawn(receive_loop.run_guarded()));
        self.connection = Some(connection);
        self.state = ConsumerState::Running;

        info!(consumer_id = %self.consumer_id, "Queue consumer started");
        Ok(())
    }

    /// Stop the receive loop and release the connection. Never fails.
    pub async fn stop(&mut self) -> StopOutcome {
        info!(consumer_id = %self.consumer_id, "Stopping queue consumer");
        self.state = ConsumerState::Stopping;
        self.running.store(false, Ordering::SeqCst);

        let outcome = match self.task.take() {
            None => StopOutcome::NotStarted,
            Some(mut task) => {
                match tokio::time::timeout(self.config.grace_period, &mut task).await {
                    Ok(result) => {
                        self.log_join_result(result);
                        StopOutcome::Drained
                    }
                    Err(_) => {
                        warn!(
                            consumer_id = %self.consumer_id,
                            grace_period_ms = self.config.grace_period.as_millis(),
                            "Timeout waiting for receive task to complete"
                        );
                        task.abort();
                        self.log_join_result(task.await);
                        StopOutcome::Cancelled
                    }
                }
            }
        };

        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.close().await {
                error!(
                    consumer_id = %self.consumer_id,
                    error = %e,
                    "Error closing queue connection"
                );
            }
        }

        self.state = ConsumerState::Stopped;
        info!(consumer_id = %self.consumer_id, outcome = ?outcome, "Queue consumer stopped");
        outcome
    }

    fn log_join_result(&self, result: Result<(), JoinError>) {
        match result {
            Ok(()) => debug!(consumer_id = %self.consumer_id, "Receive task joined"),
            Err(e) if e.is_cancelled() => {
                info!(consumer_id = %self.consumer_id, "Message receiving task cancelled");
            }
            Err(e) => {
                error!(consumer_id = %self.consumer_id, error = %e, "Receive task failed");
            }
        }
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn has_active_task(&self) -> bool {
        self.task.is_some()
    }

    /// Whether the receive task is still executing (it may have ended on its own)
    pub fn is_receiving(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub fn consumer_id(&self) -> Uuid {
        self.consumer_id
    }
}

/// Everything the spawned receive task needs, detached from the consumer
struct ReceiveLoop {
    consumer_id: Uuid,
    connection: Arc<dyn QueueConnection>,
    handler: Arc<dyn MessageHandler>,
    queue_name: String,
    max_wait: Duration,
    backoff: Duration,
    running: Arc<AtomicBool>,
}

impl ReceiveLoop {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Task entry point. A panic inside the loop ends the task without
    /// reaching the host; an abort simply drops this future.
    async fn run_guarded(self) {
        info!(
            consumer_id = %self.consumer_id,
            queue = %self.queue_name,
            "Starting to receive messages from queue"
        );

        if let Err(panic) = AssertUnwindSafe(self.run()).catch_unwind().await {
            error!(
                consumer_id = %self.consumer_id,
                panic = %panic_message(panic.as_ref()),
                "Fatal error in message receiver"
            );
        }

        info!(consumer_id = %self.consumer_id, "Message receiving task completed");
    }

    async fn run(&self) {
        while self.is_running() {
            if let Err(e) = self.receive_session().await {
                error!(
                    consumer_id = %self.consumer_id,
                    queue = %self.queue_name,
                    error = %e,
                    backoff_ms = self.backoff.as_millis(),
                    "Error receiving messages"
                );
                tokio::time::sleep(self.backoff).await;
            }
        }
    }

    /// Drain one receive session, acknowledging each message after its handler succeeded
    async fn receive_session(&self) -> MessagingResult<()> {
        let mut session = self
            .connection
            .open_session(&self.queue_name, self.max_wait)
            .await?;

        while let Some(message) = session.next_message().await? {
            if !self.is_running() {
                debug!(
                    consumer_id = %self.consumer_id,
                    message_id = message.message_id,
                    "Stop requested; leaving message unacknowledged"
                );
                break;
            }

            self.handler.handle(&message).await?;
            session.complete(&message).await?;
        }

        Ok(())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
