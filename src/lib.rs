//! Namespaced record stores over interchangeable key-value media.
//!
//! - [`LocalStore`] adapts a synchronous [`SyncMedium`] and keeps an index of
//!   its keys.
//! - [`AsyncStore`] adapts an asynchronous [`AsyncMedium`] with batch reads
//!   and removals.
//! - [`TieredStore`] is an in-memory cache that hydrates from, and writes
//!   through to, any other store.
//!
//! All of them implement the one asynchronous [`Store`] contract, and every
//! record is a [`Record`]: a serializable document with a string id.

// Lets `#[derive(Record)]` refer to `::tiered_store` from inside this crate.
extern crate self as tiered_store;

mod async_store;
mod error;
mod local;
mod medium;
mod namespace;
mod record;
mod store;
mod tiered;

pub use async_store::AsyncStore;
pub use error::{MediumError, StoreError};
pub use local::LocalStore;
pub use medium::{AsyncMedium, InMemoryAsyncMedium, InMemoryMedium, SyncMedium};
pub use namespace::{validate_id, Namespace, DELIMITER};
pub use record::Record;
pub use store::Store;
pub use tiered::{TieredStore, TieredStoreBuilder, WritePolicy};

// Re-export the derive macro alongside the trait of the same name.
pub use tiered_store_macros::Record;

// Re-exported so implementors of the store and medium traits use the same macro.
pub use async_trait::async_trait;
