//! Store - The common asynchronous contract for every store kind.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::Record;

/// Asynchronous CRUD storage for records identified by their id.
///
/// Implemented by [`LocalStore`](crate::LocalStore) over synchronous media,
/// [`AsyncStore`](crate::AsyncStore) over asynchronous media and
/// [`TieredStore`](crate::TieredStore) as an in-memory cache tier.
///
/// `delete` and `delete_all` are idempotent. `save` always overwrites.
#[async_trait]
pub trait Store<R: Record>: Send + Sync {
    /// Save (or overwrite) a record under its own id. Resolves with the record.
    async fn save(&self, record: &R) -> Result<R, StoreError>;

    /// Get a record by id. Fails with `NotFound` if there is none.
    async fn get(&self, id: &str) -> Result<R, StoreError>;

    /// Get a record by id, or `None` if there is none.
    async fn find(&self, id: &str) -> Result<Option<R>, StoreError> {
        match self.get(id).await {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Every record in the store.
    async fn get_all(&self) -> Result<Vec<R>, StoreError>;

    /// Delete a record by id. Resolves with the id whether or not it existed.
    async fn delete(&self, id: &str) -> Result<String, StoreError>;

    /// Delete every record in the store.
    async fn delete_all(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<R: Record, S: Store<R> + ?Sized> Store<R> for Arc<S> {
    async fn save(&self, record: &R) -> Result<R, StoreError> {
        (**self).save(record).await
    }

    async fn get(&self, id: &str) -> Result<R, StoreError> {
        (**self).get(id).await
    }

    async fn find(&self, id: &str) -> Result<Option<R>, StoreError> {
        (**self).find(id).await
    }

    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        (**self).get_all().await
    }

    async fn delete(&self, id: &str) -> Result<String, StoreError> {
        (**self).delete(id).await
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        (**self).delete_all().await
    }
}
