//! Per-collection change notification with two independent channels.
//!
//! `Local` mirrors a same-document custom event raised by the writer itself.
//! `External` mirrors the storage event raised for writes made by another
//! process; it never fires for local writes, which is why consumers watch both.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use hearthware_domain::CollectionKey;

use crate::{Listeners, Subscription};

/// Which channel delivered a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeOrigin {
    /// Written in this process.
    Local,
    /// Written by another process.
    External,
}

/// Notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionChanged {
    /// Rewritten collection.
    pub key: CollectionKey,
    /// Delivering channel.
    pub origin: ChangeOrigin,
}

/// Registry of collection listeners keyed by `(collection, channel)`.
#[derive(Debug, Default)]
pub struct ChangeHub {
    channels: Mutex<HashMap<(CollectionKey, ChangeOrigin), Listeners<CollectionChanged>>>,
}

impl ChangeHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, key: CollectionKey, origin: ChangeOrigin) -> Listeners<CollectionChanged> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((key, origin))
            .or_default()
            .clone()
    }

    /// Registers one callback on a single channel.
    pub fn subscribe<F>(&self, key: CollectionKey, origin: ChangeOrigin, callback: F) -> Subscription
    where
        F: Fn(&CollectionChanged) + Send + Sync + 'static,
    {
        self.channel(key, origin).subscribe(callback)
    }

    /// Registers one callback on both channels of a collection.
    pub fn watch<F>(&self, key: CollectionKey, callback: F) -> CollectionWatch
    where
        F: Fn(&CollectionChanged) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let local_callback = Arc::clone(&callback);

        CollectionWatch {
            local: self.subscribe(key, ChangeOrigin::Local, move |event| local_callback(event)),
            external: self.subscribe(key, ChangeOrigin::External, move |event| callback(event)),
        }
    }

    /// Fires the same-process channel. Returns the number of callbacks run.
    pub fn emit_local(&self, key: CollectionKey) -> usize {
        self.emit(key, ChangeOrigin::Local)
    }

    /// Fires the cross-process channel. Returns the number of callbacks run.
    pub fn emit_external(&self, key: CollectionKey) -> usize {
        self.emit(key, ChangeOrigin::External)
    }

    fn emit(&self, key: CollectionKey, origin: ChangeOrigin) -> usize {
        self.channel(key, origin)
            .emit(&CollectionChanged { key, origin })
    }

    /// Returns the number of subscriptions on one channel.
    #[must_use]
    pub fn listener_count(&self, key: CollectionKey, origin: ChangeOrigin) -> usize {
        self.channel(key, origin).len()
    }
}

/// Pair of subscriptions created by [`ChangeHub::watch`].
#[derive(Debug)]
#[must_use = "dropping a watch immediately unsubscribes it"]
pub struct CollectionWatch {
    local: Subscription,
    external: Subscription,
}

impl CollectionWatch {
    /// Unsubscribes from both channels now.
    pub fn cancel(self) {
        self.local.cancel();
        self.external.cancel();
    }
}
