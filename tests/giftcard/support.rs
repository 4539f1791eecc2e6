#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use giftcard_ledger::{
    EventRecord, EventStore, EventStoreError, GiftCardEvent, GiftCardService, InMemoryEventStore,
    StoredEvent,
};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber filtered by `RUST_LOG`. Safe to call
/// from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn service() -> GiftCardService<InMemoryEventStore> {
    init_tracing();
    GiftCardService::new(InMemoryEventStore::new())
}

/// Event store that lets a rival writer redeem 1 from the first non-empty
/// stream it loads, right after the load. The caller's append is then stale.
#[derive(Default)]
pub struct RacingStore {
    pub inner: InMemoryEventStore,
    raced: AtomicBool,
}

impl EventStore for RacingStore {
    fn append(
        &self,
        id: &str,
        expected_version: u64,
        record: EventRecord,
    ) -> Result<u64, EventStoreError> {
        self.inner.append(id, expected_version, record)
    }

    fn load_events(&self, id: &str) -> Result<Vec<StoredEvent>, EventStoreError> {
        let history = self.inner.load_events(id)?;
        if !history.is_empty() && !self.raced.swap(true, Ordering::SeqCst) {
            let rival = GiftCardEvent::Redeemed {
                id: id.to_string(),
                amount: 1,
            }
            .to_record()
            .expect("encode rival event");
            self.inner.append(id, history.len() as u64, rival)?;
        }
        Ok(history)
    }

    fn read_feed(&self, after: u64, max: usize) -> Result<Vec<StoredEvent>, EventStoreError> {
        self.inner.read_feed(after, max)
    }

    fn last_sequence(&self) -> Result<u64, EventStoreError> {
        self.inner.last_sequence()
    }
}
