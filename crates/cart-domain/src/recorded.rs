//! Events as handed over by an event store, before decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::aggregate::DomainEvent;

/// Errors that can occur while decoding a recorded event.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The tag is not one of the event type's variants.
    #[error("Unsupported event type: {0}")]
    Unsupported(String),

    /// The payload does not deserialize into the tagged variant.
    #[error("Malformed {event_type} payload: {source}")]
    Malformed {
        event_type: String,
        source: serde_json::Error,
    },
}

/// A tagged event payload that has not been decoded yet.
///
/// Domain events serialize as `{"type": <tag>, "data": <payload>}`; a
/// recorded event keeps the two halves apart so the tag can be checked
/// against the closed set of known variants before the payload is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// The event type tag (e.g. "ItemAdded").
    pub event_type: String,

    /// The event payload as JSON.
    pub payload: Value,
}

impl RecordedEvent {
    /// Creates a recorded event from a raw tag and payload.
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// Encodes a domain event.
    pub fn from_event<E: DomainEvent>(event: &E) -> Result<Self, serde_json::Error> {
        let mut value = serde_json::to_value(event)?;
        let payload = value.get_mut("data").map(Value::take).unwrap_or_default();

        Ok(Self::new(event.event_type(), payload))
    }

    /// Decodes into a domain event.
    ///
    /// Unknown tags are rejected without looking at the payload.
    pub fn decode<E: DomainEvent>(&self) -> Result<E, DecodeError> {
        if !E::is_supported(&self.event_type) {
            return Err(DecodeError::Unsupported(self.event_type.clone()));
        }

        let tagged = serde_json::json!({
            "type": self.event_type,
            "data": self.payload,
        });

        serde_json::from_value(tagged).map_err(|source| DecodeError::Malformed {
            event_type: self.event_type.clone(),
            source,
        })
    }
}
