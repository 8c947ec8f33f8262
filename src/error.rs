use std::fmt;

/// Failure reported by a storage medium.
///
/// Media are black boxes to the stores, so the error only carries the
/// medium's own description of what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumError {
    message: String,
}

impl MediumError {
    pub fn new(message: impl Into<String>) -> Self {
        MediumError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for MediumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MediumError {}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A store id or record id is empty or contains characters outside `[-_a-zA-Z0-9]`.
    InvalidIdentifier(String),
    /// The record passed to `save` has no usable id.
    MissingId,
    /// No record stored under this id.
    NotFound(String),
    /// The underlying medium rejected an operation.
    Medium(MediumError),
    /// Serialization/deserialization error.
    Serde(String),
    /// An in-process lock was poisoned.
    LockPoisoned(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidIdentifier(id) => write!(
                f,
                "invalid identifier {:?}: must be non-empty and contain only [-_a-zA-Z0-9]",
                id
            ),
            StoreError::MissingId => {
                write!(f, "record must have an id property whose value is a non-empty string")
            }
            StoreError::NotFound(id) => write!(f, "id not found: {}", id),
            StoreError::Medium(err) => write!(f, "medium error: {}", err),
            StoreError::Serde(msg) => write!(f, "record serialization error: {}", msg),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Medium(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MediumError> for StoreError {
    fn from(err: MediumError) -> Self {
        StoreError::Medium(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}
