//! Queue client traits
//!
//! The consumer talks to its queue endpoint only through these seams, so the
//! pgmq backend and in-memory test doubles are interchangeable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::errors::MessagingResult;
use super::message::InboundMessage;

/// Opens connections to a queue endpoint
#[async_trait]
pub trait QueueConnector: Send + Sync {
    async fn connect(&self, connection_string: &str) -> MessagingResult<Arc<dyn QueueConnection>>;
}

/// An open connection to a queue endpoint
#[async_trait]
pub trait QueueConnection: Send + Sync {
    /// Open a receive session that ends once no message arrives within `max_wait`
    async fn open_session(
        &self,
        queue_name: &str,
        max_wait: Duration,
    ) -> MessagingResult<Box<dyn ReceiveSession>>;

    /// Release the connection
    async fn close(&self) -> MessagingResult<()>;
}

/// A scoped, time-bounded stream of delivered messages
#[async_trait]
pub trait ReceiveSession: Send {
    /// Next delivered message, or `None` once the session is exhausted
    async fn next_message(&mut self) -> MessagingResult<Option<InboundMessage>>;

    /// Acknowledge a handled message so the queue removes it
    async fn complete(&mut self, message: &InboundMessage) -> MessagingResult<()>;
}

/// Per-message processing invoked by the receive loop
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: &InboundMessage) -> MessagingResult<()>;
}
