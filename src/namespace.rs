//! Namespace - Collision-free physical keys for stores sharing one medium.
//!
//! A physical key is `"store_id:record_id"`. Both parts are restricted to
//! `[-_a-zA-Z0-9]`, which excludes the delimiter, so distinct
//! `(store_id, record_id)` pairs never map to the same key.

use crate::error::StoreError;

/// Separator between the store id and the record id in a physical key.
pub const DELIMITER: char = ':';

fn is_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

/// Check that `id` is non-empty and contains only `[-_a-zA-Z0-9]`.
pub fn validate_id(id: &str) -> Result<&str, StoreError> {
    if id.is_empty() || !id.chars().all(is_id_char) {
        return Err(StoreError::InvalidIdentifier(id.to_string()));
    }
    Ok(id)
}

/// A validated logical store identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    store_id: String,
}

impl Namespace {
    /// Validate `store_id` and wrap it.
    pub fn new(store_id: &str) -> Result<Self, StoreError> {
        validate_id(store_id)?;
        Ok(Namespace {
            store_id: store_id.to_string(),
        })
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// The physical key for `record_id`. The id is assumed to be validated.
    pub fn physical_key(&self, record_id: &str) -> String {
        format!("{}{}{}", self.store_id, DELIMITER, record_id)
    }

    /// Validate `record_id`, then derive its physical key.
    pub fn key_for(&self, record_id: &str) -> Result<String, StoreError> {
        validate_id(record_id)?;
        Ok(self.physical_key(record_id))
    }

    /// Recover the record id from a physical key of this namespace.
    ///
    /// Returns `None` for keys that belong to another namespace.
    pub fn extract<'a>(&self, physical_key: &'a str) -> Option<&'a str> {
        physical_key
            .strip_prefix(self.store_id.as_str())?
            .strip_prefix(DELIMITER)
    }

    /// Like [`extract`](Self::extract), but also drops keys whose suffix is
    /// not a valid record id. Such entries cannot be addressed through a
    /// store, so enumeration skips them.
    pub fn record_id<'a>(&self, physical_key: &'a str) -> Option<&'a str> {
        self.extract(physical_key)
            .filter(|record_id| validate_id(record_id).is_ok())
    }
}
