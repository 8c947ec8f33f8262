//! Media - The flat key-value storage the backend adapters wrap.
//!
//! Media know nothing about records or namespaces: they store strings under
//! string keys. [`LocalStore`](crate::LocalStore) adapts a [`SyncMedium`] and
//! [`AsyncStore`](crate::AsyncStore) adapts an [`AsyncMedium`].

mod memory;

use async_trait::async_trait;

use crate::error::MediumError;

pub use memory::{InMemoryAsyncMedium, InMemoryMedium};

/// A synchronous flat key-value medium (browser-style local storage, an
/// embedded map, a file of key/value lines).
pub trait SyncMedium: Send + Sync {
    /// The value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), MediumError>;

    /// Every key currently stored, across all namespaces.
    fn keys(&self) -> Result<Vec<String>, MediumError>;
}

/// A natively asynchronous key-value medium with batch primitives (device
/// storage reached over IPC, a remote KV service).
#[async_trait]
pub trait AsyncMedium: Send + Sync {
    /// The value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), MediumError>;

    /// Read several keys at once. Returns one `(key, value)` pair per
    /// requested key, in request order, with `None` for absent keys.
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, MediumError>;

    /// Remove several keys at once.
    async fn multi_remove(&self, keys: &[String]) -> Result<(), MediumError>;

    /// Every key currently stored, across all namespaces.
    async fn get_all_keys(&self) -> Result<Vec<String>, MediumError>;
}
