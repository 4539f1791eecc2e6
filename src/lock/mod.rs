//! Per-card locks serializing command handling.
//!
//! Commands against one card must observe every previously accepted command,
//! so the service holds the card's lock from load through append. Commands
//! for different cards take different locks and run in parallel.

mod guard;
mod in_memory;

use std::sync::Arc;

use thiserror::Error;

pub use guard::LockGuard;
pub use in_memory::{InMemoryLock, InMemoryLockManager};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

/// A single mutual-exclusion slot.
pub trait Lock: Send + Sync {
    /// Block until the lock is held by the caller.
    fn lock(&self) -> Result<(), LockError>;

    /// `Ok(true)` if acquired, `Ok(false)` if someone else holds it.
    fn try_lock(&self) -> Result<bool, LockError>;

    fn unlock(&self) -> Result<(), LockError>;
}

/// Hands out one lock per key; the same key always maps to the same lock.
pub trait LockManager: Send + Sync {
    type Lock: Lock;

    fn get_lock(&self, key: &str) -> Result<Arc<Self::Lock>, LockError>;
}
