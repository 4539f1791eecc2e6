//! Event store seam: per-card append with optimistic concurrency, stream
//! loading for replay, and a globally ordered feed for projections.

mod in_memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event_record::EventRecord;

pub use in_memory::InMemoryEventStore;

/// An appended record together with its stream id and global position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub aggregate_id: String,
    /// Position in the store-wide append order, starting at 1.
    pub global_sequence: u64,
    pub record: EventRecord,
}

impl StoredEvent {
    /// Position within the card's own stream.
    pub fn sequence(&self) -> u64 {
        self.record.sequence
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventStoreError {
    #[error("concurrency conflict on stream {id} (expected version {expected}, actual {actual})")]
    ConcurrencyConflict {
        id: String,
        expected: u64,
        actual: u64,
    },
    #[error("event store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

pub trait EventStore: Send + Sync {
    /// Append one record to stream `id`, which must currently be at
    /// `expected_version`. Returns the global sequence number assigned.
    fn append(
        &self,
        id: &str,
        expected_version: u64,
        record: EventRecord,
    ) -> Result<u64, EventStoreError>;

    /// All events of stream `id` in append order. Unknown ids yield an empty
    /// stream.
    fn load_events(&self, id: &str) -> Result<Vec<StoredEvent>, EventStoreError>;

    /// Up to `max` events with a global sequence greater than `after`, in
    /// global order.
    fn read_feed(&self, after: u64, max: usize) -> Result<Vec<StoredEvent>, EventStoreError>;

    /// Highest global sequence assigned so far, 0 when empty.
    fn last_sequence(&self) -> Result<u64, EventStoreError>;
}

impl<T: EventStore + ?Sized> EventStore for std::sync::Arc<T> {
    fn append(
        &self,
        id: &str,
        expected_version: u64,
        record: EventRecord,
    ) -> Result<u64, EventStoreError> {
        (**self).append(id, expected_version, record)
    }

    fn load_events(&self, id: &str) -> Result<Vec<StoredEvent>, EventStoreError> {
        (**self).load_events(id)
    }

    fn read_feed(&self, after: u64, max: usize) -> Result<Vec<StoredEvent>, EventStoreError> {
        (**self).read_feed(after, max)
    }

    fn last_sequence(&self) -> Result<u64, EventStoreError> {
        (**self).last_sequence()
    }
}
