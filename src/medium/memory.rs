//! In-memory media for tests, demos and embedding.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use super::{AsyncMedium, SyncMedium};
use crate::error::MediumError;

/// In-memory synchronous medium backed by an ordered map.
///
/// Keys are listed in lexicographic order. Clone-friendly via Arc: clones
/// share the same storage, so several stores can sit on one medium.
#[derive(Clone, Default)]
pub struct InMemoryMedium {
    storage: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryMedium {
    /// Create a new empty medium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys stored, across all namespaces.
    pub fn len(&self) -> Result<usize, MediumError> {
        let storage = self.storage.read().map_err(|_| poisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, MediumError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned(operation: &str) -> MediumError {
    MediumError::new(format!("in-memory medium lock poisoned during {}", operation))
}

impl SyncMedium for InMemoryMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        let storage = self.storage.read().map_err(|_| poisoned("get_item"))?;
        Ok(storage.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut storage = self.storage.write().map_err(|_| poisoned("set_item"))?;
        storage.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), MediumError> {
        let mut storage = self.storage.write().map_err(|_| poisoned("remove_item"))?;
        storage.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        let storage = self.storage.read().map_err(|_| poisoned("keys"))?;
        Ok(storage.keys().cloned().collect())
    }
}

/// Asynchronous medium over an [`InMemoryMedium`], with optional latency.
///
/// Every operation sleeps for the configured latency before touching the
/// map, which makes it a stand-in for a slow device.
#[derive(Clone, Default)]
pub struct InMemoryAsyncMedium {
    inner: InMemoryMedium,
    latency: Option<Duration>,
}

impl InMemoryAsyncMedium {
    /// Create a new empty medium with no latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve from an existing synchronous medium, sharing its storage.
    pub fn from_medium(inner: InMemoryMedium) -> Self {
        InMemoryAsyncMedium {
            inner,
            latency: None,
        }
    }

    /// Delay every operation by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The underlying synchronous storage.
    pub fn inner(&self) -> &InMemoryMedium {
        &self.inner
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AsyncMedium for InMemoryAsyncMedium {
    async fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        self.delay().await;
        self.inner.get_item(key)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError> {
        self.delay().await;
        self.inner.set_item(key, value)
    }

    async fn remove_item(&self, key: &str) -> Result<(), MediumError> {
        self.delay().await;
        self.inner.remove_item(key)
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, MediumError> {
        self.delay().await;
        let mut pairs = Vec::with_capacity(keys.len());
        for key in keys {
            pairs.push((key.clone(), self.inner.get_item(key)?));
        }
        Ok(pairs)
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<(), MediumError> {
        self.delay().await;
        let mut storage = self
            .inner
            .storage
            .write()
            .map_err(|_| poisoned("multi_remove"))?;
        for key in keys {
            storage.remove(key);
        }
        Ok(())
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, MediumError> {
        self.delay().await;
        self.inner.keys()
    }
}
