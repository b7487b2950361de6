//! # Messaging Module
//!
//! Queue ingestion for the booking service: message types, the queue client
//! seams, the pgmq backend and the background [`QueueConsumer`].

pub mod consumer;
pub mod errors;
pub mod handler;
pub mod message;
pub mod pgmq_client;
pub mod traits;

pub use consumer::{ConsumerState, QueueConsumer, StopOutcome};
pub use errors::{MessagingError, MessagingResult};
pub use handler::LoggingMessageHandler;
pub use message::{ApplicationProperties, InboundMessage};
pub use pgmq_client::{PgmqConnection, PgmqConnector, PgmqReceiveSession};
pub use traits::{MessageHandler, QueueConnection, QueueConnector, ReceiveSession};
