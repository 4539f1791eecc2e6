//! Read models: query-optimized rows maintained by projections.
//!
//! A store keeps rows per collection in id order together with one
//! watermark per collection. Rows and watermark share a critical section, so a
//! reader always sees a row set that matches the watermark it is handed.

mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use in_memory::InMemoryReadModelStore;
pub use store::ReadModelStore;

/// Trait for types that can be stored as read models.
pub trait ReadModel: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Collection name: a table in SQL, a key prefix in a KV store.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Row data plus the version its writer assigned.
///
/// Projections use the version to remember the last source-stream sequence
/// folded into the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// A value read together with the watermark it reflects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    pub value: T,
    pub watermark: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadModelError {
    #[error("read model serialization error: {0}")]
    Serde(String),
    #[error("read model storage error: {0}")]
    Storage(String),
    #[error("read model {collection}:{id} written with id {actual}")]
    IdMismatch {
        collection: String,
        id: String,
        actual: String,
    },
}
