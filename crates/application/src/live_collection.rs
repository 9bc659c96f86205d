//! Self-refreshing, filtered view over one local collection.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{CollectionWatch, LocalRepository};

/// Filtered snapshot that reloads whenever either change channel fires.
///
/// Dropping the view unsubscribes it from both channels.
pub struct LiveCollection<T> {
    items: Arc<RwLock<Vec<T>>>,
    _watch: CollectionWatch,
}

impl<T> LiveCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Loads the initial snapshot and subscribes.
    pub fn new<P>(repository: &LocalRepository<T>, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let items = Arc::new(RwLock::new(repository.load_filtered(&predicate)));

        let reader = repository.clone();
        let target = Arc::clone(&items);
        let watch = repository.watch(move |event| {
            let fresh = reader.load_filtered(&predicate);
            debug!(
                collection = %event.key,
                origin = ?event.origin,
                items = fresh.len(),
                "live collection reloaded"
            );
            *target.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        });

        Self {
            items,
            _watch: watch,
        }
    }

    /// Loads every item of the collection.
    pub fn unfiltered(repository: &LocalRepository<T>) -> Self {
        Self::new(repository, |_| true)
    }

    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of items in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hearthware_domain::CollectionKey;
    use serde::{Deserialize, Serialize};

    use crate::test_support::local_parts;
    use crate::{ChangeOrigin, KeyValueStore, LocalRepository};

    use super::LiveCollection;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        kind: String,
    }

    fn row(id: u32, kind: &str) -> Row {
        Row {
            id,
            kind: kind.to_owned(),
        }
    }

    #[test]
    fn local_write_reaches_view_after_commit() {
        let (store, hub, signal) = local_parts();
        let repository: LocalRepository<Row> =
            LocalRepository::new(CollectionKey::Products, store, hub, signal);
        let pots = LiveCollection::new(&repository, |row: &Row| row.kind == "pots");
        assert!(pots.is_empty());

        assert!(
            repository
                .replace_all(&[row(1, "pots"), row(2, "pans"), row(3, "pots")])
                .is_ok()
        );

        let ids: Vec<u32> = pots.snapshot().iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn external_signal_reloads_from_store() {
        let (store, hub, signal) = local_parts();
        let repository: LocalRepository<Row> =
            LocalRepository::new(CollectionKey::Products, store.clone(), hub.clone(), signal);
        let view = LiveCollection::unfiltered(&repository);

        // Another process rewrote the key; only the storage event tells us.
        assert!(store.set_item("products", r#"[{"id":7,"kind":"pans"}]"#).is_ok());
        assert!(view.is_empty());

        assert_eq!(hub.emit_external(CollectionKey::Products), 1);
        assert_eq!(view.snapshot(), vec![row(7, "pans")]);
    }

    #[test]
    fn dropping_view_unsubscribes() {
        let (store, hub, signal) = local_parts();
        let repository: LocalRepository<Row> =
            LocalRepository::new(CollectionKey::Enquiries, store, Arc::clone(&hub), signal);

        let view = LiveCollection::unfiltered(&repository);
        assert_eq!(
            hub.listener_count(CollectionKey::Enquiries, ChangeOrigin::Local),
            1
        );

        drop(view);
        assert_eq!(
            hub.listener_count(CollectionKey::Enquiries, ChangeOrigin::Local),
            0
        );
        assert_eq!(
            hub.listener_count(CollectionKey::Enquiries, ChangeOrigin::External),
            0
        );
        assert!(repository.replace_all(&[row(1, "pots")]).is_ok());
    }
}
