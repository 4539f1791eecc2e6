#![allow(dead_code)]

use std::time::{Duration, Instant};

use giftcard_ledger::{
    CardSummaryFilter, CountCardSummariesQuery, GiftCardLedger, InMemoryEventStore,
    InMemoryReadModelStore, LedgerConfig,
};
use tracing_subscriber::EnvFilter;

pub type Ledger = GiftCardLedger<InMemoryEventStore, InMemoryReadModelStore>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ledger() -> Ledger {
    init_tracing();
    GiftCardLedger::in_memory(LedgerConfig::default())
}

pub fn count_prefix(ledger: &Ledger, prefix: &str) -> (usize, u64) {
    let response = ledger
        .count(&CountCardSummariesQuery {
            filter: CardSummaryFilter::starting_with(prefix),
        })
        .unwrap();
    (response.count, response.last_event)
}

/// Poll until the projection reports `watermark`, or panic after `timeout`.
pub fn wait_for_watermark(ledger: &Ledger, watermark: u64, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    while count_prefix(ledger, "").1 < watermark {
        assert!(Instant::now() < deadline, "projection never reached {watermark}");
        std::thread::sleep(Duration::from_millis(2));
    }
}
