//! Event-sourced gift-card ledger.
//!
//! Card balances are derived only from each card's event stream
//! ([`giftcard`], [`aggregate`]); reads are served from a separately
//! maintained summary projection ([`projection`]) that reports how far into
//! the event feed it has caught up.

pub mod aggregate;
pub mod config;
pub mod event_record;
pub mod event_store;
pub mod giftcard;
pub mod ledger;
pub mod lock;
pub mod projection;
pub mod read_model;
pub mod service;

pub use aggregate::{hydrate, replay, Aggregate};
pub use config::{ConfigError, LedgerConfig};
pub use event_record::{EventRecord, PayloadError};
pub use event_store::{EventStore, EventStoreError, InMemoryEventStore, StoredEvent};
pub use giftcard::{GiftCard, GiftCardCommand, GiftCardEvent, Rejection, ReplayError};
pub use ledger::GiftCardLedger;
pub use projection::{
    CardSummary, CardSummaryFilter, CardSummaryProjection, CountCardSummariesQuery,
    CountCardSummariesResponse, FetchCardSummariesQuery, ProjectionError, ProjectionWorker,
    ProjectionWorkerThread,
};
pub use read_model::{InMemoryReadModelStore, ReadModelStore};
pub use service::{BulkIssuer, CommandSubmitter, GiftCardService, SubmitError};
