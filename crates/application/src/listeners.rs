//! In-process observer registry.
//!
//! Callbacks run synchronously on the emitting thread. The registry is
//! snapshotted before dispatch, so a callback may subscribe or drop its own
//! subscription while it runs.

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<E>)>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Thread-safe list of change callbacks for one event type.
pub struct Listeners<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }
}

impl<E> Debug for Listeners<E> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}

impl<E: 'static> Listeners<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback. Dropping the returned guard unregisters it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id = registry.next_id.wrapping_add(1);
            registry.callbacks.push((id, Arc::new(callback)));
            id
        };

        let registry: Weak<Mutex<Registry<E>>> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                // Dropped after the lock is released: a callback may own
                // subscriptions on this same registry.
                let removed: Vec<(u64, Callback<E>)> = {
                    let mut registry = lock(&registry);
                    let (removed, kept) = std::mem::take(&mut registry.callbacks)
                        .into_iter()
                        .partition(|(callback_id, _)| *callback_id == id);
                    registry.callbacks = kept;
                    removed
                };
                drop(removed);
            }
        })
    }

    /// Invokes every registered callback and returns how many ran.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<Callback<E>> = lock(&self.registry)
            .callbacks
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &snapshot {
            callback(event);
        }

        snapshot.len()
    }
}

impl<E> Listeners<E> {
    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.registry).callbacks.len()
    }

    /// Returns whether nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guard for one registration. Unsubscribes on drop.
#[must_use = "dropping a subscription immediately unsubscribes it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unsubscribes now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Debug for Subscription {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::Listeners;

    #[test]
    fn every_subscriber_receives_the_event() {
        let listeners = Listeners::<u32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let first_total = Arc::clone(&total);
        let _first = listeners.subscribe(move |value| {
            first_total.fetch_add(*value as usize, Ordering::SeqCst);
        });
        let second_total = Arc::clone(&total);
        let _second = listeners.subscribe(move |value| {
            second_total.fetch_add(*value as usize, Ordering::SeqCst);
        });

        assert_eq!(listeners.emit(&5), 2);
        assert_eq!(total.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let listeners = Listeners::<()>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let subscription = listeners.subscribe(move |()| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        listeners.emit(&());
        drop(subscription);
        listeners.emit(&());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn callback_may_subscribe_while_running() {
        let listeners = Listeners::<()>::new();
        let inner = listeners.clone();
        let nested = Arc::new(std::sync::Mutex::new(Vec::new()));

        let nested_guards = Arc::clone(&nested);
        let _outer = listeners.subscribe(move |()| {
            let guard = inner.subscribe(|()| {});
            if let Ok(mut guards) = nested_guards.lock() {
                guards.push(guard);
            }
        });

        assert_eq!(listeners.emit(&()), 1);
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn explicit_cancel_unregisters() {
        let listeners = Listeners::<()>::new();
        let subscription = listeners.subscribe(|()| {});
        assert_eq!(listeners.len(), 1);

        subscription.cancel();
        assert!(listeners.is_empty());
    }
}
