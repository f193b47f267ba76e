//! Core aggregate and domain event traits.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Every tag this event type can carry.
    ///
    /// A recorded event whose tag is not listed here cannot be decoded.
    const EVENT_TYPES: &'static [&'static str];

    /// Returns the event type name.
    ///
    /// This is used for serialization and diagnostics.
    fn event_type(&self) -> &'static str;

    /// Returns true if `event_type` names a variant of this event type.
    fn is_supported(event_type: &str) -> bool {
        Self::EVENT_TYPES.contains(&event_type)
    }
}

/// Trait for aggregates in an event-sourced system.
///
/// An aggregate never exists before its first event. Replay starts from
/// `None` and threads the state through [`Aggregate::apply`]:
///
/// ```text
/// None ──apply(e0)──► Some(a1) ──apply(e1)──► Some(a2) ── ...
/// ```
///
/// `apply` must be pure and deterministic:
/// - Given the same state and event, it always produces the same result
/// - It has no side effects and never reads the clock
/// - It rejects events that are invalid for the current state
pub trait Aggregate: Sized + Send + Sync {
    /// The type of events this aggregate consumes.
    type Event: DomainEvent;

    /// The type of errors produced by invalid transitions.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The aggregate's identifier type.
    type Id: Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> Self::Id;

    /// Applies one event to the previous state and returns the next state.
    ///
    /// `state` is `None` until the aggregate's creation event has been
    /// applied. On error the previous state is consumed and discarded.
    fn apply(state: Option<Self>, event: &Self::Event) -> Result<Self, Self::Error>;

    /// Applies multiple events in sequence, starting from `None`.
    ///
    /// Stops at the first invalid event.
    fn apply_events<'a>(
        events: impl IntoIterator<Item = &'a Self::Event>,
    ) -> Result<Option<Self>, Self::Error>
    where
        Self::Event: 'a,
    {
        events
            .into_iter()
            .try_fold(None, |state, event| Self::apply(state, event).map(Some))
    }
}
