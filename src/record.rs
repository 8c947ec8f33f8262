//! Record - The unit of storage.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

/// Trait for types that can be kept in a [`Store`](crate::Store).
///
/// A record is any serializable document with a string identifier. Derive it
/// with `#[derive(Record)]`, marking the id field with `#[record(id)]` when it
/// is not called `id`.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The record's identifier, or `None` if it has none.
    fn id(&self) -> Option<&str>;
}

/// Dynamic JSON documents are records when they are objects with a string `id`.
impl Record for serde_json::Value {
    fn id(&self) -> Option<&str> {
        self.get("id").and_then(serde_json::Value::as_str)
    }
}

/// The id a store should file `record` under, or `MissingId`.
pub(crate) fn required_id<R: Record>(record: &R) -> Result<&str, StoreError> {
    match record.id() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(StoreError::MissingId),
    }
}
