use std::fmt;

use crate::event_record::{EventRecord, PayloadError};
use crate::event_store::StoredEvent;

/// A consistency boundary whose state is derived only from its event history.
///
/// Both methods are pure. [`apply`](Aggregate::apply) folds one event into
/// the state and refuses events the current state cannot legally follow;
/// [`handle`](Aggregate::handle) decides whether a command is allowed and
/// returns the single event it produces.
pub trait Aggregate: Sized + Default {
    /// Prefix used for log fields and store namespaces (e.g. "gift_card").
    const AGGREGATE_TYPE: &'static str;

    type Command;
    type Event: for<'a> TryFrom<&'a EventRecord, Error = PayloadError>;
    type Rejection: std::error::Error;
    type ReplayError: std::error::Error + From<PayloadError>;

    fn apply(&mut self, event: &Self::Event) -> Result<(), Self::ReplayError>;

    fn handle(&self, command: &Self::Command) -> Result<Self::Event, Self::Rejection>;
}

/// Fold an ordered event sequence into a fresh aggregate.
pub fn replay<'a, A, I>(events: I) -> Result<A, A::ReplayError>
where
    A: Aggregate,
    A::Event: 'a,
    I: IntoIterator<Item = &'a A::Event>,
{
    let mut aggregate = A::default();
    for event in events {
        aggregate.apply(event)?;
    }
    Ok(aggregate)
}

/// Decode a loaded stream and replay it.
pub fn hydrate<A: Aggregate>(history: &[StoredEvent]) -> Result<A, A::ReplayError> {
    let mut aggregate = A::default();
    for stored in history {
        let event = A::Event::try_from(&stored.record)?;
        aggregate.apply(&event)?;
    }
    Ok(aggregate)
}

/// Version an aggregate must be at before the next append: the length of its
/// stream.
pub fn expected_version(history: &[StoredEvent]) -> u64 {
    history.last().map(|e| e.record.sequence).unwrap_or(0)
}

/// Displays `type:id`, used as the lock key and log target for a stream.
pub struct StreamKey<'a> {
    pub aggregate_type: &'static str,
    pub id: &'a str,
}

impl<'a> StreamKey<'a> {
    pub fn of<A: Aggregate>(id: &'a str) -> Self {
        StreamKey {
            aggregate_type: A::AGGREGATE_TYPE,
            id,
        }
    }
}

impl fmt::Display for StreamKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.aggregate_type, self.id)
    }
}
