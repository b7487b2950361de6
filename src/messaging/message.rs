//! # Inbound Queue Messages
//!
//! Messages are opaque to the service: a text body plus string-keyed
//! application properties, along with the delivery metadata the queue reports.
//!
//! Producers may wrap a payload in an envelope
//! `{"body": ..., "application_properties": {...}}`; anything else is taken as
//! the body itself.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// String-keyed properties attached to a message by its producer
pub type ApplicationProperties = BTreeMap<String, String>;

const ENVELOPE_BODY: &str = "body";
const ENVELOPE_PROPERTIES: &str = "application_properties";

/// One message delivered by a receive session
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Queue-assigned identifier, used for acknowledgment
    pub message_id: i64,
    /// How many times the queue has handed this message out
    pub delivery_count: i32,
    pub enqueued_at: DateTime<Utc>,
    pub body: String,
    pub application_properties: ApplicationProperties,
}

impl InboundMessage {
    pub fn new(message_id: i64, body: impl Into<String>) -> Self {
        Self {
            message_id,
            delivery_count: 1,
            enqueued_at: Utc::now(),
            body: body.into(),
            application_properties: ApplicationProperties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.application_properties.insert(key.into(), value.into());
        self
    }

    /// Build a message from a JSON queue payload, unwrapping an envelope when present
    pub fn from_payload(
        message_id: i64,
        delivery_count: i32,
        enqueued_at: DateTime<Utc>,
        payload: Value,
    ) -> Self {
        let (body, application_properties) = split_envelope(payload);
        Self {
            message_id,
            delivery_count,
            enqueued_at,
            body,
            application_properties,
        }
    }

    /// Text representation of the message
    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn has_properties(&self) -> bool {
        !self.application_properties.is_empty()
    }
}

fn is_envelope(fields: &Map<String, Value>) -> bool {
    fields.contains_key(ENVELOPE_BODY)
        && fields
            .keys()
            .all(|key| key == ENVELOPE_BODY || key == ENVELOPE_PROPERTIES)
}

fn render(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn split_envelope(payload: Value) -> (String, ApplicationProperties) {
    let mut fields = match payload {
        Value::Object(fields) if is_envelope(&fields) => fields,
        other => return (render(other), ApplicationProperties::new()),
    };

    let body = fields.remove(ENVELOPE_BODY).map(render).unwrap_or_default();
    let properties = match fields.remove(ENVELOPE_PROPERTIES) {
        Some(Value::Object(props)) => props
            .into_iter()
            .map(|(key, value)| (key, render(value)))
            .collect(),
        _ => ApplicationProperties::new(),
    };

    (body, properties)
}
