use thiserror::Error;

use crate::event_record::PayloadError;

/// Why a command was refused. A rejected command never produces an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("gift card {id} has already been issued")]
    AlreadyIssued { id: String },
    #[error("gift card {id} not found")]
    NotFound { id: String },
    #[error("invalid amount {amount}: must be greater than zero")]
    InvalidAmount { amount: i64 },
    #[error("insufficient balance on gift card {id}: requested {requested}, remaining {remaining}")]
    InsufficientBalance {
        id: String,
        requested: i64,
        remaining: i64,
    },
}

/// A stored history that no sequence of accepted commands could have produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("gift card {id} issued twice")]
    AlreadyIssued { id: String },
    #[error("{event} replayed for gift card {id} before it was issued")]
    NotIssued { id: String, event: &'static str },
    #[error("{event} for gift card {id} carries non-positive amount {amount}")]
    InvalidAmount {
        id: String,
        event: &'static str,
        amount: i64,
    },
    #[error("redeeming {amount} overdraws gift card {id} (remaining {remaining})")]
    Overdrawn {
        id: String,
        amount: i64,
        remaining: i64,
    },
    #[error("event for gift card {actual} found in stream {expected}")]
    ForeignEvent { expected: String, actual: String },
    #[error(transparent)]
    Payload(#[from] PayloadError),
}
