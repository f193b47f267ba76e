//! Replay driver: rebuilds an aggregate by folding its history in order.
//!
//! The history's order is the causal order. Events are never reordered,
//! deduplicated or skipped, and the first failure aborts the replay without
//! handing back any partial state.

use crate::aggregate::{Aggregate, DomainEvent};
use crate::cart::{Cart, CartEvent, CartId};
use crate::error::ReplayError;
use crate::recorded::RecordedEvent;

/// Options controlling a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions<I = CartId> {
    /// Identifier the rebuilt aggregate must carry.
    /// If None, no identity check is performed.
    pub expected_id: Option<I>,
}

impl<I> ReplayOptions<I> {
    /// Creates options with no identity check.
    pub fn new() -> Self {
        Self { expected_id: None }
    }

    /// Creates options expecting the history to rebuild the given aggregate.
    ///
    /// Guards against an event store handing back the wrong stream.
    pub fn expect_id(id: I) -> Self {
        Self {
            expected_id: Some(id),
        }
    }
}

impl<I> Default for ReplayOptions<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds `events` into an aggregate, starting from no state.
///
/// Returns `Ok(None)` for an empty history.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(aggregate_type = A::aggregate_type())
)]
pub fn replay<'a, A, I>(
    events: I,
    options: &ReplayOptions<A::Id>,
) -> Result<Option<A>, ReplayError<A::Error>>
where
    A: Aggregate,
    A::Event: 'a,
    I: IntoIterator<Item = &'a A::Event>,
{
    metrics::counter!("aggregate_replays_total", "aggregate_type" => A::aggregate_type())
        .increment(1);

    let result = events
        .into_iter()
        .enumerate()
        .try_fold(Replayer::<A>::new(), |replayer, (index, event)| {
            replayer.apply(index, event)
        })
        .and_then(|replayer| replayer.finish(options));

    observe::<A, _>(result)
}

/// Decodes and folds recorded events in one pass.
///
/// Decoding stops at the first unknown tag or malformed payload.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(aggregate_type = A::aggregate_type())
)]
pub fn replay_recorded<'a, A, I>(
    records: I,
    options: &ReplayOptions<A::Id>,
) -> Result<Option<A>, ReplayError<A::Error>>
where
    A: Aggregate,
    I: IntoIterator<Item = &'a RecordedEvent>,
{
    metrics::counter!("aggregate_replays_total", "aggregate_type" => A::aggregate_type())
        .increment(1);

    let result = records
        .into_iter()
        .enumerate()
        .try_fold(Replayer::<A>::new(), |replayer, (index, record)| {
            let event = record
                .decode::<A::Event>()
                .map_err(|error| ReplayError::<A::Error>::from_decode(index, error))?;
            replayer.apply(index, &event)
        })
        .and_then(|replayer| replayer.finish(options));

    observe::<A, _>(result)
}

/// Folds a cart history, returning `None` when the history is empty.
pub fn fold<'a, I>(events: I) -> Result<Option<Cart>, ReplayError>
where
    I: IntoIterator<Item = &'a CartEvent>,
{
    replay::<Cart, _>(events, &ReplayOptions::new())
}

/// Rebuilds the current cart from its history.
pub fn reconstruct<'a, I>(events: I) -> Result<Cart, ReplayError>
where
    I: IntoIterator<Item = &'a CartEvent>,
{
    reconstruct_with(events, &ReplayOptions::new())
}

/// Rebuilds the current cart, applying the given replay options.
pub fn reconstruct_with<'a, I>(events: I, options: &ReplayOptions) -> Result<Cart, ReplayError>
where
    I: IntoIterator<Item = &'a CartEvent>,
{
    replay::<Cart, _>(events, options)?.ok_or(ReplayError::EmptyHistory {
        aggregate_type: Cart::aggregate_type(),
    })
}

/// Decodes and rebuilds the current cart from recorded events.
pub fn reconstruct_recorded<'a, I>(records: I) -> Result<Cart, ReplayError>
where
    I: IntoIterator<Item = &'a RecordedEvent>,
{
    let cart = replay_recorded::<Cart, _>(records, &ReplayOptions::new())?;

    cart.ok_or(ReplayError::EmptyHistory {
        aggregate_type: Cart::aggregate_type(),
    })
}

/// State owned by a single replay.
struct Replayer<A> {
    state: Option<A>,
    applied: u64,
}

impl<A: Aggregate> Replayer<A> {
    fn new() -> Self {
        Self {
            state: None,
            applied: 0,
        }
    }

    fn apply(mut self, index: usize, event: &A::Event) -> Result<Self, ReplayError<A::Error>> {
        let event_type = event.event_type();

        let next = A::apply(self.state, event).map_err(|source| ReplayError::Apply {
            index,
            event_type,
            source,
        })?;

        tracing::trace!(index, event_type, "event applied");
        self.state = Some(next);
        self.applied += 1;
        Ok(self)
    }

    fn finish(self, options: &ReplayOptions<A::Id>) -> Result<Option<A>, ReplayError<A::Error>> {
        if let (Some(expected), Some(aggregate)) = (options.expected_id, &self.state) {
            let actual = aggregate.id();
            if actual != expected {
                return Err(ReplayError::UnexpectedAggregate {
                    aggregate_type: A::aggregate_type(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        metrics::counter!(
            "aggregate_events_applied_total",
            "aggregate_type" => A::aggregate_type()
        )
        .increment(self.applied);
        tracing::debug!(events_applied = self.applied, "replay complete");

        Ok(self.state)
    }
}

fn observe<A, T>(result: Result<T, ReplayError<A::Error>>) -> Result<T, ReplayError<A::Error>>
where
    A: Aggregate,
{
    if let Err(error) = &result {
        tracing::warn!(
            index = ?error.index(),
            event_type = error.event_type(),
            reason = error.reason(),
            %error,
            "replay failed"
        );
        metrics::counter!(
            "aggregate_replay_failures_total",
            "aggregate_type" => A::aggregate_type(),
            "reason" => error.reason()
        )
        .increment(1);
    }

    result
}
