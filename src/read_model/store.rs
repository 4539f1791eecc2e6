use super::{ReadModel, ReadModelError, Snapshot, Versioned};

/// Abstract ordered row storage for read models.
pub trait ReadModelStore: Send + Sync {
    fn get_model<M: ReadModel>(&self, id: &str) -> Result<Option<Versioned<M>>, ReadModelError>;

    /// Atomically read row `id`, let `change` decide its replacement, write
    /// it, and raise the collection watermark to `position` if that is higher.
    ///
    /// `change` returning `Ok(None)` leaves the row untouched but still raises
    /// the watermark. An `Err` from `change` aborts the whole operation: no row
    /// is written and the watermark stays put.
    fn modify<M, E, F>(&self, id: &str, position: u64, change: F) -> Result<Option<Versioned<M>>, E>
    where
        M: ReadModel,
        E: From<ReadModelError>,
        F: FnOnce(Option<Versioned<M>>) -> Result<Option<Versioned<M>>, E>;

    fn watermark<M: ReadModel>(&self) -> Result<u64, ReadModelError>;

    /// Number of rows whose id starts with `prefix`.
    fn count_prefix<M: ReadModel>(&self, prefix: &str) -> Result<Snapshot<usize>, ReadModelError>;

    /// Rows whose id starts with `prefix`, ascending by id, after skipping
    /// `offset` and keeping at most `limit`.
    fn scan_prefix<M: ReadModel>(
        &self,
        prefix: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Snapshot<Vec<Versioned<M>>>, ReadModelError>;
}

impl<S: ReadModelStore> ReadModelStore for std::sync::Arc<S> {
    fn get_model<M: ReadModel>(&self, id: &str) -> Result<Option<Versioned<M>>, ReadModelError> {
        (**self).get_model(id)
    }

    fn modify<M, E, F>(&self, id: &str, position: u64, change: F) -> Result<Option<Versioned<M>>, E>
    where
        M: ReadModel,
        E: From<ReadModelError>,
        F: FnOnce(Option<Versioned<M>>) -> Result<Option<Versioned<M>>, E>,
    {
        (**self).modify(id, position, change)
    }

    fn watermark<M: ReadModel>(&self) -> Result<u64, ReadModelError> {
        (**self).watermark::<M>()
    }

    fn count_prefix<M: ReadModel>(&self, prefix: &str) -> Result<Snapshot<usize>, ReadModelError> {
        (**self).count_prefix::<M>(prefix)
    }

    fn scan_prefix<M: ReadModel>(
        &self,
        prefix: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Snapshot<Vec<Versioned<M>>>, ReadModelError> {
        (**self).scan_prefix(prefix, offset, limit)
    }
}
