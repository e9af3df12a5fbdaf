//! In-memory session storage for tests and single-process sessions

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::SessionStorage;
use crate::core::error::StorageError;

/// In-memory session storage
///
/// Uses RwLock for thread-safe access; clones share the same session.
#[derive(Clone, Default)]
pub struct InMemorySessionStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self
            .items
            .read()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;

        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;

        items.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;

        items.remove(key);

        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;

        items.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = InMemorySessionStorage::new();
        storage.set_item("inventory", "[]").unwrap();
        assert_eq!(storage.get_item("inventory").unwrap().as_deref(), Some("[]"));

        storage.remove_item("inventory").unwrap();
        assert_eq!(storage.get_item("inventory").unwrap(), None);
    }

    #[test]
    fn test_clones_share_session() {
        let storage = InMemorySessionStorage::new();
        let other = storage.clone();
        storage.set_item("a", "1").unwrap();
        assert_eq!(other.get_item("a").unwrap().as_deref(), Some("1"));

        other.clear().unwrap();
        assert!(storage.is_empty());
    }
}
