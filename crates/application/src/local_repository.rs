//! Whole-collection persistence over a key/value store.
//!
//! A collection is one JSON array stored under one key. Every write replaces
//! the full array; there is no per-record versioning, so concurrent writers
//! race and the last `save_all` wins. This is a scaling limit accepted for a
//! single admin operator.

use std::marker::PhantomData;
use std::sync::Arc;

use hearthware_core::{AppError, AppResult};
use hearthware_domain::CollectionKey;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{ChangeHub, CollectionChanged, CollectionWatch, KeyValueStore, StorageSignal};

/// Repository for one named collection.
pub struct LocalRepository<T> {
    key: CollectionKey,
    store: Arc<dyn KeyValueStore>,
    hub: Arc<ChangeHub>,
    signal: Arc<dyn StorageSignal>,
    _items: PhantomData<fn() -> T>,
}

impl<T> Clone for LocalRepository<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            store: Arc::clone(&self.store),
            hub: Arc::clone(&self.hub),
            signal: Arc::clone(&self.signal),
            _items: PhantomData,
        }
    }
}

impl<T> LocalRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a repository bound to one storage key.
    #[must_use]
    pub fn new(
        key: CollectionKey,
        store: Arc<dyn KeyValueStore>,
        hub: Arc<ChangeHub>,
        signal: Arc<dyn StorageSignal>,
    ) -> Self {
        Self {
            key,
            store,
            hub,
            signal,
            _items: PhantomData,
        }
    }

    /// Returns the storage key.
    #[must_use]
    pub fn key(&self) -> CollectionKey {
        self.key
    }

    /// Reads the whole collection in stored order.
    ///
    /// A missing key, unreadable store or malformed blob yields an empty
    /// collection and a warning, never an error.
    #[must_use]
    pub fn load_all(&self) -> Vec<T> {
        let raw = match self.store.get_item(self.key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(collection = %self.key, "collection not initialised; treating as empty");
                return Vec::new();
            }
            Err(error) => {
                warn!(collection = %self.key, error = %error, "failed to read collection");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(error) => {
                warn!(collection = %self.key, error = %error, "malformed collection blob; treating as empty");
                Vec::new()
            }
        }
    }

    /// Reads the items matching a predicate, preserving stored order.
    pub fn load_filtered<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.load_all()
            .into_iter()
            .filter(|item| predicate(item))
            .collect()
    }

    /// Serializes and replaces the stored blob. Does not notify.
    pub fn save_all(&self, items: &[T]) -> AppResult<()> {
        let raw = serde_json::to_string(items).map_err(|error| {
            AppError::Internal(format!(
                "failed to encode collection '{}': {error}",
                self.key
            ))
        })?;

        self.store.set_item(self.key.as_str(), &raw)
    }

    /// Tells same-process watchers, then peers in other processes.
    pub fn notify_changed(&self) {
        let delivered = self.hub.emit_local(self.key);
        self.signal.announce(self.key);
        debug!(collection = %self.key, listeners = delivered, "collection change announced");
    }

    /// Saves then notifies. Watchers always observe the committed write.
    pub fn replace_all(&self, items: &[T]) -> AppResult<()> {
        self.save_all(items)?;
        self.notify_changed();
        Ok(())
    }

    /// Read-modify-write of the whole collection.
    ///
    /// When `mutate` fails nothing is written and nobody is notified.
    pub fn update<R, F>(&self, mutate: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        let mut items = self.load_all();
        let outcome = mutate(&mut items)?;
        self.replace_all(&items)?;
        Ok(outcome)
    }

    /// Watches both change channels of this collection.
    pub fn watch<F>(&self, callback: F) -> CollectionWatch
    where
        F: Fn(&CollectionChanged) + Send + Sync + 'static,
    {
        self.hub.watch(self.key, callback)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hearthware_core::AppError;
    use hearthware_domain::CollectionKey;
    use serde::{Deserialize, Serialize};

    use crate::test_support::{FakeKeyValueStore, RecordingSignal};
    use crate::{ChangeHub, KeyValueStore};

    use super::LocalRepository;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        tag: String,
    }

    fn item(id: &str, tag: &str) -> Item {
        Item {
            id: id.to_owned(),
            tag: tag.to_owned(),
        }
    }

    fn repository(
        store: Arc<FakeKeyValueStore>,
    ) -> (LocalRepository<Item>, Arc<ChangeHub>, Arc<RecordingSignal>) {
        let hub = Arc::new(ChangeHub::new());
        let signal = Arc::new(RecordingSignal::default());
        let repository =
            LocalRepository::new(CollectionKey::Products, store, hub.clone(), signal.clone());
        (repository, hub, signal)
    }

    #[test]
    fn missing_key_loads_empty() {
        let (repository, _, _) = repository(Arc::new(FakeKeyValueStore::default()));
        assert!(repository.load_all().is_empty());
    }

    #[test]
    fn malformed_blob_loads_empty() {
        let store = Arc::new(FakeKeyValueStore::default());
        assert!(store.set_item("products", "{not json").is_ok());

        let (repository, _, _) = repository(store);
        assert!(repository.load_all().is_empty());
    }

    #[test]
    fn store_failure_loads_empty() {
        let store = Arc::new(FakeKeyValueStore::default());
        store.fail_reads(true);

        let (repository, _, _) = repository(store);
        assert!(repository.load_all().is_empty());
    }

    #[test]
    fn round_trip_preserves_content() {
        let store = Arc::new(FakeKeyValueStore::default());
        let original = r#"[{"tag":"b","id":"2"},{"id":"1","tag":"a"}]"#;
        assert!(store.set_item("products", original).is_ok());

        let (repository, _, _) = repository(store.clone());
        let loaded = repository.load_all();
        assert!(repository.save_all(&loaded).is_ok());

        let stored = store
            .get_item("products")
            .ok()
            .flatten()
            .unwrap_or_default();
        let before: serde_json::Value = serde_json::from_str(original).unwrap_or_default();
        let after: serde_json::Value = serde_json::from_str(&stored).unwrap_or_default();
        assert_eq!(before, after);
    }

    #[test]
    fn replace_all_notifies_after_commit() {
        let store = Arc::new(FakeKeyValueStore::default());
        let (repository, _, signal) = repository(store);
        let observed = Arc::new(AtomicUsize::new(0));

        let reader = repository.clone();
        let observed_len = Arc::clone(&observed);
        let _watch = repository.watch(move |_| {
            observed_len.store(reader.load_all().len(), Ordering::SeqCst);
        });

        assert!(repository.replace_all(&[item("1", "a"), item("2", "b")]).is_ok());
        assert_eq!(observed.load(Ordering::SeqCst), 2);
        assert_eq!(signal.announced(), vec![CollectionKey::Products]);
    }

    #[test]
    fn save_all_alone_does_not_notify() {
        let (repository, hub, signal) = repository(Arc::new(FakeKeyValueStore::default()));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _watch = hub.watch(CollectionKey::Products, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(repository.save_all(&[item("1", "a")]).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(signal.announced().is_empty());
    }

    #[test]
    fn failed_mutation_writes_nothing() {
        let store = Arc::new(FakeKeyValueStore::default());
        let (repository, _, signal) = repository(store.clone());
        assert!(repository.replace_all(&[item("1", "a")]).is_ok());

        let result: Result<(), AppError> = repository.update(|items| {
            items.clear();
            Err(AppError::NotFound("item '9' not found".to_owned()))
        });

        assert!(result.is_err());
        assert_eq!(repository.load_all(), vec![item("1", "a")]);
        assert_eq!(signal.announced().len(), 1);
    }

    #[test]
    fn load_filtered_keeps_stored_order() {
        let (repository, _, _) = repository(Arc::new(FakeKeyValueStore::default()));
        assert!(
            repository
                .replace_all(&[item("1", "a"), item("2", "b"), item("3", "a")])
                .is_ok()
        );

        let filtered = repository.load_filtered(|value| value.tag == "a");
        let ids: Vec<&str> = filtered.iter().map(|value| value.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
