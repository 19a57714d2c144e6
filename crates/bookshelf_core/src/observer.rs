//! Change-notification registry for catalog subscribers.
//!
//! # Responsibility
//! - Keep an ordered set of distinct observers.
//! - Deliver one snapshot to every observer on each catalog change.
//!
//! # Invariants
//! - Observer identity is `Arc` pointer identity; registering twice is a no-op.
//! - Delivery follows registration order.
//! - Delivery is fire-and-forget; the registry does not retry or isolate.

use crate::model::book::BookRecord;
use std::sync::Arc;

/// Subscriber notified with the full catalog contents after each change.
///
/// Implementations run while the catalog lock is held and must not call back
/// into the same catalog.
pub trait CatalogObserver: Send + Sync {
    fn on_catalog_changed(&self, snapshot: &[BookRecord]);
}

impl<F> CatalogObserver for F
where
    F: Fn(&[BookRecord]) + Send + Sync,
{
    fn on_catalog_changed(&self, snapshot: &[BookRecord]) {
        self(snapshot)
    }
}

/// Ordered set of observer handles.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn CatalogObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `observer` unless it is already registered.
    ///
    /// Returns `true` when the observer was newly added.
    pub fn register(&mut self, observer: Arc<dyn CatalogObserver>) -> bool {
        if self.contains(&observer) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Removes `observer`; returns `true` when it was registered.
    pub fn unregister(&mut self, observer: &Arc<dyn CatalogObserver>) -> bool {
        let before = self.observers.len();
        self.observers
            .retain(|registered| !Arc::ptr_eq(registered, observer));
        self.observers.len() != before
    }

    pub fn contains(&self, observer: &Arc<dyn CatalogObserver>) -> bool {
        self.observers
            .iter()
            .any(|registered| Arc::ptr_eq(registered, observer))
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Delivers `snapshot` to every observer in registration order.
    pub fn notify(&self, snapshot: &[BookRecord]) {
        for observer in &self.observers {
            observer.on_catalog_changed(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogObserver, ObserverRegistry};
    use crate::model::book::BookRecord;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<(&'static str, usize)>>>,
    }

    impl CatalogObserver for Recorder {
        fn on_catalog_changed(&self, snapshot: &[BookRecord]) {
            self.log.lock().push((self.tag, snapshot.len()));
        }
    }

    #[test]
    fn register_is_idempotent_per_handle() {
        let mut registry = ObserverRegistry::new();
        let observer: Arc<dyn CatalogObserver> = Arc::new(|_: &[BookRecord]| {});

        assert!(registry.register(observer.clone()));
        assert!(!registry.register(observer.clone()));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(&observer));
        assert!(!registry.unregister(&observer));
        assert!(registry.is_empty());
    }

    #[test]
    fn notify_follows_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        for tag in ["first", "second", "third"] {
            registry.register(Arc::new(Recorder {
                tag,
                log: log.clone(),
            }));
        }

        let book = BookRecord::new("T", "A", "1234567890", "G", 2000).unwrap();
        registry.notify(&[book]);

        assert_eq!(
            *log.lock(),
            vec![("first", 1), ("second", 1), ("third", 1)]
        );
    }
}
