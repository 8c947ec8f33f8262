//! AsyncStore - Store adapter over an asynchronous medium.
//!
//! There is no local index: enumeration lists every key in the medium and
//! keeps the ones under this store's namespace, on every call.

use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreError;
use crate::medium::AsyncMedium;
use crate::namespace::Namespace;
use crate::record::{required_id, Record};
use crate::store::Store;

/// A [`Store`] over an [`AsyncMedium`], namespaced by a store id.
pub struct AsyncStore<R, M> {
    medium: M,
    namespace: Namespace,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record, M: AsyncMedium> AsyncStore<R, M> {
    /// Open the store `store_id` on `medium`.
    pub fn new(medium: M, store_id: &str) -> Result<Self, StoreError> {
        Ok(AsyncStore {
            medium,
            namespace: Namespace::new(store_id)?,
            _marker: PhantomData,
        })
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Record ids currently stored under this namespace, in medium order.
    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.medium.get_all_keys().await?;
        let ids: Vec<String> = keys
            .iter()
            .filter_map(|key| self.namespace.record_id(key))
            .map(str::to_string)
            .collect();
        debug!(store = self.namespace.store_id(), ids = ?ids, "async store keys");
        Ok(ids)
    }

    async fn physical_keys(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.medium.get_all_keys().await?;
        Ok(keys
            .into_iter()
            .filter(|key| self.namespace.record_id(key).is_some())
            .collect())
    }
}

#[async_trait]
impl<R: Record, M: AsyncMedium> Store<R> for AsyncStore<R, M> {
    async fn save(&self, record: &R) -> Result<R, StoreError> {
        let id = required_id(record)?;
        let key = self.namespace.key_for(id)?;
        let json = serde_json::to_string(record)?;
        self.medium.set_item(&key, &json).await?;
        debug!(store = self.namespace.store_id(), id, "async store saved");
        Ok(record.clone())
    }

    async fn get(&self, id: &str) -> Result<R, StoreError> {
        let key = self.namespace.key_for(id)?;
        match self.medium.get_item(&key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        let keys = self.physical_keys().await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let pairs = self.medium.multi_get(&keys).await?;
        let mut records = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            match value {
                Some(json) => records.push(serde_json::from_str(&json)?),
                // Removed between listing and reading.
                None => debug!(store = self.namespace.store_id(), key = %key, "async store skipped vanished key"),
            }
        }
        debug!(store = self.namespace.store_id(), records = records.len(), "async store get_all");
        Ok(records)
    }

    async fn delete(&self, id: &str) -> Result<String, StoreError> {
        let key = self.namespace.key_for(id)?;
        self.medium.remove_item(&key).await?;
        debug!(store = self.namespace.store_id(), id, "async store deleted");
        Ok(id.to_string())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let keys = self.physical_keys().await?;
        if !keys.is_empty() {
            self.medium.multi_remove(&keys).await?;
        }
        debug!(store = self.namespace.store_id(), removed = keys.len(), "async store delete_all");
        Ok(())
    }
}
