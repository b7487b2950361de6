//! Default message handler: log the message text and its properties.

use async_trait::async_trait;
use tracing::{error, info};

use super::errors::{MessagingError, MessagingResult};
use super::message::InboundMessage;
use super::traits::MessageHandler;

/// Logs every received message. Booking events are not processed further yet.
#[derive(Debug, Clone, Default)]
pub struct LoggingMessageHandler;

impl LoggingMessageHandler {
    pub fn new() -> Self {
        Self
    }

    fn log_message(message: &InboundMessage) -> MessagingResult<()> {
        let properties = serde_json::to_string(&message.application_properties)?;

        info!(
            message_id = message.message_id,
            delivery_count = message.delivery_count,
            body = %message.text(),
            "📨 Queue event received"
        );
        if message.has_properties() {
            info!(
                message_id = message.message_id,
                properties = %properties,
                "Message properties"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for LoggingMessageHandler {
    async fn handle(&self, message: &InboundMessage) -> MessagingResult<()> {
        Self::log_message(message).map_err(|e| {
            error!(message_id = message.message_id, error = %e, "Error processing message");
            MessagingError::handler(message.message_id, e.to_string())
        })
    }
}
