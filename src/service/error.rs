use thiserror::Error;

use crate::event_record::PayloadError;
use crate::event_store::EventStoreError;
use crate::giftcard::{Rejection, ReplayError};
use crate::lock::LockError;

/// Why a submitted command produced no event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The command is invalid against the card's current state. Terminal for
    /// this command.
    #[error("command rejected: {0}")]
    Rejected(#[from] Rejection),

    /// Another writer appended to the card between load and append. The
    /// caller may resubmit.
    #[error("card {id} was modified concurrently (expected version {expected}, found {actual})")]
    ConcurrencyConflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("card history failed to replay: {0}")]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Store(EventStoreError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl SubmitError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            SubmitError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SubmitError::ConcurrencyConflict { .. })
    }
}

impl From<EventStoreError> for SubmitError {
    fn from(err: EventStoreError) -> Self {
        match err {
            EventStoreError::ConcurrencyConflict {
                id,
                expected,
                actual,
            } => SubmitError::ConcurrencyConflict {
                id,
                expected,
                actual,
            },
            other => SubmitError::Store(other),
        }
    }
}
