use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{EventStore, EventStoreError, StoredEvent};
use crate::event_record::EventRecord;

#[derive(Default)]
struct Log {
    /// Store-wide append order; index `n` holds global sequence `n + 1`.
    feed: Vec<StoredEvent>,
    /// Per-stream indexes into `feed`.
    streams: HashMap<String, Vec<usize>>,
}

/// HashMap-backed event store. Clones share the same log.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    log: Arc<RwLock<Log>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of streams that have at least one event.
    pub fn stream_count(&self) -> Result<usize, EventStoreError> {
        let log = self
            .log
            .read()
            .map_err(|_| EventStoreError::LockPoisoned("stream count"))?;
        Ok(log.streams.len())
    }
}

impl EventStore for InMemoryEventStore {
    fn append(
        &self,
        id: &str,
        expected_version: u64,
        mut record: EventRecord,
    ) -> Result<u64, EventStoreError> {
        let mut log = self
            .log
            .write()
            .map_err(|_| EventStoreError::LockPoisoned("append"))?;

        let actual = log.streams.get(id).map(|s| s.len() as u64).unwrap_or(0);
        if actual != expected_version {
            return Err(EventStoreError::ConcurrencyConflict {
                id: id.to_string(),
                expected: expected_version,
                actual,
            });
        }

        record.sequence = actual + 1;
        let index = log.feed.len();
        let global_sequence = index as u64 + 1;
        log.feed.push(StoredEvent {
            aggregate_id: id.to_string(),
            global_sequence,
            record,
        });
        log.streams.entry(id.to_string()).or_default().push(index);

        Ok(global_sequence)
    }

    fn load_events(&self, id: &str) -> Result<Vec<StoredEvent>, EventStoreError> {
        let log = self
            .log
            .read()
            .map_err(|_| EventStoreError::LockPoisoned("load"))?;

        Ok(log
            .streams
            .get(id)
            .map(|indexes| indexes.iter().map(|&i| log.feed[i].clone()).collect())
            .unwrap_or_default())
    }

    fn read_feed(&self, after: u64, max: usize) -> Result<Vec<StoredEvent>, EventStoreError> {
        let log = self
            .log
            .read()
            .map_err(|_| EventStoreError::LockPoisoned("feed read"))?;

        let start = usize::try_from(after).unwrap_or(usize::MAX).min(log.feed.len());
        Ok(log.feed[start..].iter().take(max).cloned().collect())
    }

    fn last_sequence(&self) -> Result<u64, EventStoreError> {
        let log = self
            .log
            .read()
            .map_err(|_| EventStoreError::LockPoisoned("last sequence"))?;
        Ok(log.feed.len() as u64)
    }
}
