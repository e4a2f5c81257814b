//! In-memory key/value storage.

use super::KeyValueStorage;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Volatile storage backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool> {
        Ok(self.items.write().remove(key).is_some())
    }

    fn clear(&self) -> Result<()> {
        self.items.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("students").unwrap(), None);

        storage.set_item("students", "[]").unwrap();
        assert_eq!(storage.get_item("students").unwrap().as_deref(), Some("[]"));

        storage.set_item("students", "[1]").unwrap();
        assert_eq!(storage.get_item("students").unwrap().as_deref(), Some("[1]"));

        assert!(storage.remove_item("students").unwrap());
        assert!(!storage.remove_item("students").unwrap());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_shared_through_arc() {
        let storage = Arc::new(MemoryStorage::new());
        let other = Arc::clone(&storage);

        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();
        assert_eq!(other.get_item("a").unwrap().as_deref(), Some("1"));

        other.clear().unwrap();
        assert_eq!(storage.len(), 0);
    }
}
