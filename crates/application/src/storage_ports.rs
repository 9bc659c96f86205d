use hearthware_core::AppResult;
use hearthware_domain::CollectionKey;

/// Synchronous string key/value storage (browser local storage analogue).
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value for a key.
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the value for a key.
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    /// Deletes a key. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> AppResult<()>;
}

/// Cross-process change announcement (browser storage event analogue).
///
/// Delivery is best-effort and unordered with respect to other processes.
pub trait StorageSignal: Send + Sync {
    /// Tells peers in other processes that a collection was rewritten.
    fn announce(&self, key: CollectionKey);
}
