//! The `card_summary` read model: per-card balances kept current from the
//! event feed, plus the count and fetch queries served from it.

mod engine;
mod error;
mod query;
mod summary;
mod worker;

pub use engine::{ApplyOutcome, CardSummaryProjection};
pub use error::{ConsistencyError, ProjectionError, WorkerError};
pub use query::{
    CardSummaryFilter, CountCardSummariesQuery, CountCardSummariesResponse,
    FetchCardSummariesQuery,
};
pub use summary::CardSummary;
pub use worker::{ProjectionWorker, ProjectionWorkerThread, WorkerStats};
