//! Replay error types.

use thiserror::Error;

use crate::cart::CartError;
use crate::recorded::DecodeError;

/// Errors that abort a replay.
///
/// Every variant tied to a specific event carries its 0-based position in
/// the history.
#[derive(Debug, Error)]
pub enum ReplayError<E = CartError>
where
    E: std::error::Error + 'static,
{
    /// The aggregate rejected an event.
    #[error("Event {index} ({event_type}) rejected: {source}")]
    Apply {
        index: usize,
        event_type: &'static str,
        #[source]
        source: E,
    },

    /// A recorded event carries a tag outside the aggregate's event set.
    #[error("Unsupported event type at {index}: {event_type}")]
    UnsupportedEvent { index: usize, event_type: String },

    /// A recorded event's payload does not match its tag.
    #[error("Malformed {event_type} payload at {index}: {source}")]
    Decode {
        index: usize,
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// The history contained no events.
    #[error("Cannot reconstruct {aggregate_type} from an empty history")]
    EmptyHistory { aggregate_type: &'static str },

    /// The history rebuilt a different aggregate than requested.
    #[error("Expected {aggregate_type} {expected}, history rebuilt {actual}")]
    UnexpectedAggregate {
        aggregate_type: &'static str,
        expected: String,
        actual: String,
    },
}

impl<E> ReplayError<E>
where
    E: std::error::Error + 'static,
{
    pub(crate) fn from_decode(index: usize, error: DecodeError) -> Self {
        match error {
            DecodeError::Unsupported(event_type) => Self::UnsupportedEvent { index, event_type },
            DecodeError::Malformed { event_type, source } => Self::Decode {
                index,
                event_type,
                source,
            },
        }
    }

    /// Returns the position of the offending event, if the error is tied to one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Apply { index, .. }
            | Self::UnsupportedEvent { index, .. }
            | Self::Decode { index, .. } => Some(*index),
            Self::EmptyHistory { .. } | Self::UnexpectedAggregate { .. } => None,
        }
    }

    /// Returns the tag of the offending event, if the error is tied to one.
    pub fn event_type(&self) -> Option<&str> {
        match self {
            Self::Apply { event_type, .. } => Some(*event_type),
            Self::UnsupportedEvent { event_type, .. } | Self::Decode { event_type, .. } => {
                Some(event_type.as_str())
            }
            Self::EmptyHistory { .. } | Self::UnexpectedAggregate { .. } => None,
        }
    }

    /// Returns the aggregate error behind an `Apply` failure.
    pub fn aggregate_error(&self) -> Option<&E> {
        match self {
            Self::Apply { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Short machine-readable reason, used as a metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Apply { .. } => "rejected",
            Self::UnsupportedEvent { .. } => "unsupported_event",
            Self::Decode { .. } => "malformed_payload",
            Self::EmptyHistory { .. } => "empty_history",
            Self::UnexpectedAggregate { .. } => "unexpected_aggregate",
        }
    }
}
