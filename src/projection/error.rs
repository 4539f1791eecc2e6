use thiserror::Error;

use crate::event_record::PayloadError;
use crate::event_store::EventStoreError;
use crate::read_model::ReadModelError;

/// The delivered stream cannot be the one the event store holds: events were
/// reordered, dropped, or the source history is corrupt. Not locally
/// recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("{event} at sequence {sequence} for card {id} has no summary row")]
    MissingSummary {
        id: String,
        event: &'static str,
        sequence: u64,
    },
    #[error("Issued at sequence {sequence} for card {id} which already has a summary row")]
    AlreadyIssued { id: String, sequence: u64 },
    #[error("gap in stream {id}: expected sequence {expected}, got {actual}")]
    SequenceGap { id: String, expected: u64, actual: u64 },
    #[error("redeeming {amount} overdraws summary {id} (remaining {remaining})")]
    Overdrawn {
        id: String,
        amount: i64,
        remaining: i64,
    },
    #[error("{event} at sequence {sequence} for card {id} carries non-positive amount {amount}")]
    InvalidAmount {
        id: String,
        event: &'static str,
        amount: i64,
        sequence: u64,
    },
    #[error("event for card {actual} delivered on stream {stream}")]
    StreamMismatch { stream: String, actual: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("projection consistency error: {0}")]
    Consistency(#[from] ConsistencyError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    ReadModel(#[from] ReadModelError),
}

impl ProjectionError {
    /// Consistency faults need operator intervention; other errors may be
    /// transient storage failures.
    pub fn is_consistency_fault(&self) -> bool {
        matches!(self, ProjectionError::Consistency(_) | ProjectionError::Payload(_))
    }
}

/// Failure while draining the event feed into the projection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("reading event feed: {0}")]
    Feed(#[from] EventStoreError),
    #[error("applying event {global_sequence}: {source}")]
    Apply {
        global_sequence: u64,
        #[source]
        source: ProjectionError,
    },
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("projection worker thread panicked")]
    Panicked,
}
