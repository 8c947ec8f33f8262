use std::collections::HashMap;

/// Id-keyed record map that remembers insertion order.
///
/// Overwriting an id keeps its original position; removing it forgets it.
pub(crate) struct Cache<R> {
    entries: HashMap<String, R>,
    order: Vec<String>,
}

impl<R: Clone> Cache<R> {
    pub(crate) fn new() -> Self {
        Cache {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, id: String, record: R) {
        if self.entries.insert(id.clone(), record).is_none() {
            self.order.push(id);
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<&R> {
        self.entries.get(id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<R> {
        let removed = self.entries.remove(id)?;
        self.order.retain(|known| known != id);
        Some(removed)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Clones of every record, in insertion order.
    pub(crate) fn values(&self) -> Vec<R> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .cloned()
            .collect()
    }
}
