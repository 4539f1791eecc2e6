//! InMemoryReadModelStore - BTreeMap-backed read model store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ReadModel, ReadModelError, ReadModelStore, Snapshot, Versioned};

struct StoredModel {
    bytes: Vec<u8>,
    version: u64,
}

#[derive(Default)]
struct Tables {
    /// Keyed `"COLLECTION:id"`; BTreeMap order gives id order within a collection.
    rows: BTreeMap<String, StoredModel>,
    watermarks: HashMap<&'static str, u64>,
}

/// In-memory read model store. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryReadModelStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryReadModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, ReadModelError> {
        self.tables
            .read()
            .map_err(|_| ReadModelError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, ReadModelError> {
        self.tables
            .write()
            .map_err(|_| ReadModelError::Storage("lock poisoned".into()))
    }
}

fn decode<M: ReadModel>(stored: &StoredModel) -> Result<Versioned<M>, ReadModelError> {
    let data =
        serde_json::from_slice(&stored.bytes).map_err(|e| ReadModelError::Serde(e.to_string()))?;
    Ok(Versioned {
        data,
        version: stored.version,
    })
}

impl Tables {
    fn prefixed<'a>(&'a self, key_prefix: &'a str) -> impl Iterator<Item = &'a StoredModel> + 'a {
        self.rows
            .range(key_prefix.to_string()..)
            .take_while(move |(key, _)| key.starts_with(key_prefix))
            .map(|(_, stored)| stored)
    }

    fn watermark(&self, collection: &'static str) -> u64 {
        self.watermarks.get(collection).copied().unwrap_or(0)
    }
}

impl ReadModelStore for InMemoryReadModelStore {
    fn get_model<M: ReadModel>(&self, id: &str) -> Result<Option<Versioned<M>>, ReadModelError> {
        let key = Self::make_key(M::COLLECTION, id);
        let tables = self.read()?;
        tables.rows.get(&key).map(decode).transpose()
    }

    fn modify<M, E, F>(&self, id: &str, position: u64, change: F) -> Result<Option<Versioned<M>>, E>
    where
        M: ReadModel,
        E: From<ReadModelError>,
        F: FnOnce(Option<Versioned<M>>) -> Result<Option<Versioned<M>>, E>,
    {
        let key = Self::make_key(M::COLLECTION, id);
        let mut tables = self.write()?;

        let current = tables.rows.get(&key).map(decode::<M>).transpose()?;
        let next = change(current)?;

        if let Some(next) = &next {
            if next.data.id() != id {
                return Err(ReadModelError::IdMismatch {
                    collection: M::COLLECTION.to_string(),
                    id: id.to_string(),
                    actual: next.data.id().to_string(),
                }
                .into());
            }
            let bytes =
                serde_json::to_vec(&next.data).map_err(|e| ReadModelError::Serde(e.to_string()))?;
            tables.rows.insert(
                key,
                StoredModel {
                    bytes,
                    version: next.version,
                },
            );
        }

        let watermark = tables.watermarks.entry(M::COLLECTION).or_insert(0);
        *watermark = (*watermark).max(position);

        Ok(next)
    }

    fn watermark<M: ReadModel>(&self) -> Result<u64, ReadModelError> {
        Ok(self.read()?.watermark(M::COLLECTION))
    }

    fn count_prefix<M: ReadModel>(&self, prefix: &str) -> Result<Snapshot<usize>, ReadModelError> {
        let key_prefix = Self::make_key(M::COLLECTION, prefix);
        let tables = self.read()?;
        Ok(Snapshot {
            value: tables.prefixed(&key_prefix).count(),
            watermark: tables.watermark(M::COLLECTION),
        })
    }

    fn scan_prefix<M: ReadModel>(
        &self,
        prefix: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Snapshot<Vec<Versioned<M>>>, ReadModelError> {
        let key_prefix = Self::make_key(M::COLLECTION, prefix);
        let tables = self.read()?;
        let value = tables
            .prefixed(&key_prefix)
            .skip(offset)
            .take(limit)
            .map(decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Snapshot {
            value,
            watermark: tables.watermark(M::COLLECTION),
        })
    }
}
