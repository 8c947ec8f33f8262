//! TieredStore - In-memory cache tier in front of an optional backing store.
//!
//! Reads are served from memory. The cache is hydrated from the backing
//! store once, lazily, on the first operation; after that the backing store
//! is only written to, never read. Writes update the cache first and are then
//! mirrored to the backing store according to the [`WritePolicy`].
//!
//! ## Example
//!
//! ```ignore
//! use tiered_store::{InMemoryMedium, LocalStore, Store, TieredStore};
//!
//! let local = LocalStore::new(InMemoryMedium::new(), "users")?;
//! let users = TieredStore::backed_by(local);
//! users.save(&user).await?;            // cache now, medium in the background
//! let same = users.get(&user.id).await?;
//! ```

mod cache;
mod writer;

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::namespace::validate_id;
use crate::record::{required_id, Record};
use crate::store::Store;

use cache::Cache;
use writer::{Backing, WriteOp};

/// Name used in logs when none is configured.
pub const DEFAULT_NAME: &str = "tiered";

/// How cache mutations reach the backing store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Queue the backing operation for a detached worker. The caller never
    /// waits for it and never sees its failure (it is logged). Queued
    /// operations reach the backing store in the order they were issued.
    #[default]
    FireAndForget,
    /// Await the backing operation after the cache mutation and return its
    /// failure to the caller. The cache keeps the mutation either way.
    Awaited,
}

/// A [`Store`] that keeps live records in memory, optionally mirrored to a
/// backing store of any kind.
pub struct TieredStore<R: Record> {
    name: String,
    cache: RwLock<Cache<R>>,
    backing: Option<Backing<R>>,
    hydrated: OnceCell<()>,
    policy: WritePolicy,
}

impl<R: Record> Default for TieredStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> TieredStore<R> {
    /// A purely in-memory store with no backing store.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// A cache in front of `backing`, with fire-and-forget write-through.
    pub fn backed_by<S: Store<R> + 'static>(backing: S) -> Self {
        Self::builder().backed_by(backing).build()
    }

    pub fn builder() -> TieredStoreBuilder<R> {
        TieredStoreBuilder {
            name: DEFAULT_NAME.to_string(),
            backing: None,
            policy: WritePolicy::default(),
        }
    }

    /// The name this store logs under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.policy
    }

    /// Whether the cache reflects the backing store yet. Always true without one.
    pub fn is_hydrated(&self) -> bool {
        self.backing.is_none() || self.hydrated.initialized()
    }

    /// Number of cached records, after hydrating.
    pub async fn count(&self) -> Result<usize, StoreError> {
        self.hydrate().await?;
        Ok(self.read_cache()?.len())
    }

    fn read_cache(&self) -> Result<std::sync::RwLockReadGuard<'_, Cache<R>>, StoreError> {
        self.cache
            .read()
            .map_err(|_| StoreError::LockPoisoned("cache read"))
    }

    fn write_cache(&self) -> Result<RwLockWriteGuard<'_, Cache<R>>, StoreError> {
        self.cache
            .write()
            .map_err(|_| StoreError::LockPoisoned("cache write"))
    }

    /// Copy the backing store into the cache, once per instance.
    ///
    /// Concurrent first callers all wait on the same in-flight load. A failed
    /// load is reported to the caller and retried by the next operation.
    async fn hydrate(&self) -> Result<(), StoreError> {
        let Some(backing) = &self.backing else {
            return Ok(());
        };

        self.hydrated
            .get_or_try_init(|| async {
                let records = backing.store().get_all().await?;
                let mut cache = self.write_cache()?;
                let mut skipped = 0usize;
                for record in records {
                    let id = match record.id() {
                        Some(id) if !id.is_empty() => id.to_string(),
                        _ => {
                            skipped += 1;
                            warn!(store = %self.name, skipped, "tiered store skipped backing record without an id");
                            continue;
                        }
                    };
                    cache.insert(id, record);
                }
                debug!(store = %self.name, records = cache.len(), skipped, "tiered store hydrated");
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(())
    }

    /// Apply `change` to the cache and mirror `op` to the backing store.
    ///
    /// Fire-and-forget operations are queued while the cache lock is held, so
    /// the backing store sees mutations in the same order as the cache.
    async fn mutate<T, F>(&self, op: WriteOp<R>, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Cache<R>) -> T + Send,
        T: Send,
    {
        let (outcome, awaited) = {
            let mut cache = self.write_cache()?;
            let outcome = change(&mut *cache);
            let awaited = match (&self.backing, self.policy) {
                (None, _) => None,
                (Some(backing), WritePolicy::FireAndForget) => {
                    backing.enqueue(&self.name, op)?;
                    None
                }
                (Some(backing), WritePolicy::Awaited) => Some((backing, op)),
            };
            (outcome, awaited)
        };

        if let Some((backing, op)) = awaited {
            op.apply(backing.store()).await?;
        }
        Ok(outcome)
    }
}

#[async_trait]
impl<R: Record> Store<R> for TieredStore<R> {
    async fn save(&self, record: &R) -> Result<R, StoreError> {
        self.hydrate().await?;
        let id = validate_id(required_id(record)?)?.to_string();
        debug!(store = %self.name, id = %id, "tiered store saving");
        self.mutate(WriteOp::Save(record.clone()), |cache| {
            cache.insert(id, record.clone())
        })
        .await?;
        Ok(record.clone())
    }

    async fn get(&self, id: &str) -> Result<R, StoreError> {
        self.hydrate().await?;
        validate_id(id)?;
        self.read_cache()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        self.hydrate().await?;
        Ok(self.read_cache()?.values())
    }

    async fn delete(&self, id: &str) -> Result<String, StoreError> {
        self.hydrate().await?;
        validate_id(id)?;
        let existed = self
            .mutate(WriteOp::Delete(id.to_string()), |cache| cache.remove(id).is_some())
            .await?;
        debug!(store = %self.name, id, existed, "tiered store deleted");
        Ok(id.to_string())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.hydrate().await?;
        self.mutate(WriteOp::DeleteAll, |cache| cache.clear()).await?;
        debug!(store = %self.name, "tiered store cleared");
        Ok(())
    }
}

/// Configures a [`TieredStore`].
pub struct TieredStoreBuilder<R: Record> {
    name: String,
    backing: Option<Arc<dyn Store<R>>>,
    policy: WritePolicy,
}

impl<R: Record> TieredStoreBuilder<R> {
    /// Name the store in its log lines.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Mirror writes to `backing` and hydrate from it.
    pub fn backed_by<S: Store<R> + 'static>(mut self, backing: S) -> Self {
        self.backing = Some(Arc::new(backing));
        self
    }

    pub fn write_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> TieredStore<R> {
        TieredStore {
            name: self.name,
            cache: RwLock::new(Cache::new()),
            backing: self.backing.map(Backing::new),
            hydrated: OnceCell::new(),
            policy: self.policy,
        }
    }
}
