use hearthware_application::StorageSignal;
use hearthware_domain::CollectionKey;
use tracing::trace;

/// Storage signal for a single process; announcements go nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStorageSignal;

impl StorageSignal for NoopStorageSignal {
    fn announce(&self, key: CollectionKey) {
        trace!(collection = %key, "no peers to notify");
    }
}
