//! LocalStore - Store adapter over a synchronous medium.
//!
//! Keeps a known-keys index of the record ids under its namespace so that
//! enumeration never has to scan the medium. The index is built by a full
//! scan at construction and maintained incrementally by `save` and `delete`.

use std::marker::PhantomData;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::medium::SyncMedium;
use crate::namespace::Namespace;
use crate::record::{required_id, Record};
use crate::store::Store;

/// A [`Store`] over a [`SyncMedium`], namespaced by a store id.
///
/// Records are stored as JSON under `"store_id:record_id"`. Several stores
/// with different ids can share one medium.
pub struct LocalStore<R, M> {
    medium: M,
    namespace: Namespace,
    keys: RwLock<Vec<String>>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record, M: SyncMedium> LocalStore<R, M> {
    /// Open the store `store_id` on `medium`, indexing the records already there.
    pub fn new(medium: M, store_id: &str) -> Result<Self, StoreError> {
        let namespace = Namespace::new(store_id)?;
        let keys = scan(&medium, &namespace)?;
        info!(store = store_id, keys = keys.len(), "local store loaded known keys");
        Ok(LocalStore {
            medium,
            namespace,
            keys: RwLock::new(keys),
            _marker: PhantomData,
        })
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Number of records in the index.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read_keys()?.len())
    }

    /// Whether `id` is in the index.
    pub fn contains_key(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read_keys()?.iter().any(|key| key == id))
    }

    /// A snapshot of the indexed record ids, oldest first.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_keys()?.clone())
    }

    fn read_keys(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<String>>, StoreError> {
        self.keys
            .read()
            .map_err(|_| StoreError::LockPoisoned("key index read"))
    }

    fn read_record(&self, id: &str) -> Result<R, StoreError> {
        let key = self.namespace.key_for(id)?;
        let value = self.medium.get_item(&key)?;
        debug!(store = self.namespace.store_id(), id, found = value.is_some(), "local store read");
        match value {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    fn remove_record(&self, id: &str) -> Result<(), StoreError> {
        let key = self.namespace.key_for(id)?;
        self.medium.remove_item(&key)?;

        let mut keys = self
            .keys
            .write()
            .map_err(|_| StoreError::LockPoisoned("key index write"))?;
        if let Some(position) = keys.iter().position(|known| known == id) {
            keys.remove(position);
        }
        debug!(store = self.namespace.store_id(), id, keys = keys.len(), "local store deleted");
        Ok(())
    }
}

fn scan<M: SyncMedium>(medium: &M, namespace: &Namespace) -> Result<Vec<String>, StoreError> {
    Ok(medium
        .keys()?
        .iter()
        .filter_map(|key| namespace.record_id(key))
        .map(str::to_string)
        .collect())
}

#[async_trait]
impl<R: Record, M: SyncMedium> Store<R> for LocalStore<R, M> {
    async fn save(&self, record: &R) -> Result<R, StoreError> {
        let id = required_id(record)?;
        let key = self.namespace.key_for(id)?;
        let json = serde_json::to_string(record)?;
        self.medium.set_item(&key, &json)?;

        let mut keys = self
            .keys
            .write()
            .map_err(|_| StoreError::LockPoisoned("key index write"))?;
        if !keys.iter().any(|known| known == id) {
            keys.push(id.to_string());
        }
        debug!(store = self.namespace.store_id(), id, keys = keys.len(), "local store saved");
        Ok(record.clone())
    }

    async fn get(&self, id: &str) -> Result<R, StoreError> {
        self.read_record(id)
    }

    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        let keys = self.keys()?;
        debug!(store = self.namespace.store_id(), keys = keys.len(), "local store get_all");
        keys.iter().map(|id| self.read_record(id)).collect()
    }

    async fn delete(&self, id: &str) -> Result<String, StoreError> {
        self.remove_record(id)?;
        Ok(id.to_string())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        // One at a time, oldest first, so the index matches the medium after
        // every step even if a removal fails part way.
        for id in self.keys()? {
            self.remove_record(&id)?;
        }
        Ok(())
    }
}
