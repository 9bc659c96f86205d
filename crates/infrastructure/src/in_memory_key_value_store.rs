use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use hearthware_application::KeyValueStore;
use hearthware_core::AppResult;

/// Process-local key/value store. Contents vanish on restart.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hearthware_application::KeyValueStore;

    use super::InMemoryKeyValueStore;

    #[test]
    fn set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get_item("products").ok().flatten(), None);

        assert!(store.set_item("products", "[]").is_ok());
        assert_eq!(store.get_item("products").ok().flatten().as_deref(), Some("[]"));

        assert!(store.remove_item("products").is_ok());
        assert!(store.remove_item("products").is_ok());
        assert_eq!(store.get_item("products").ok().flatten(), None);
    }
}
