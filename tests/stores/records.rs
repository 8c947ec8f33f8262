//! Record types used across the store suites.

use serde::{Deserialize, Serialize};
use tiered_store::Record;

/// A typed record whose id field is not called `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Record)]
pub struct Profile {
    #[record(id)]
    pub handle: String,
    pub display_name: String,
    pub tags: Vec<String>,
}

impl Profile {
    pub fn new(handle: &str, display_name: &str) -> Self {
        Self {
            handle: handle.to_string(),
            display_name: display_name.to_string(),
            tags: vec![],
        }
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }
}
