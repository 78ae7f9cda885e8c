//! In-memory token store. The session ends with the process.

use std::collections::HashMap;
use std::sync::RwLock;

use carrent_core::ports::{StoreError, TokenStore};

pub struct InMemoryTokenStore {
    store: RwLock<HashMap<String, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let store = self
            .store
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(store.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut store = self
            .store
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut store = self
            .store
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        store.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.get("jwt_token").unwrap(), None);

        store.set("jwt_token", "abc").unwrap();
        assert_eq!(store.get("jwt_token").unwrap().as_deref(), Some("abc"));

        store.remove("jwt_token").unwrap();
        assert_eq!(store.get("jwt_token").unwrap(), None);

        // Removing a missing key is fine
        store.remove("jwt_token").unwrap();
    }
}
