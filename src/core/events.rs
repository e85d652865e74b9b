//! Process-wide collection change notifications.
//!
//! Anything that mutates collections outside the dashboard (a sync job
//! finishing, another view renaming a collection) publishes a
//! [`CollectionEvent`] on the [`EventBus`]. Stores subscribe and keep their
//! caches current; the returned [`Subscription`] is the only way to stop
//! listening.

use crate::api::models::Collection;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEvent {
    Created(Collection),
    Updated(Collection),
    StatusChanged { id: String, status: String },
    Deleted { id: String },
    SourceConnectionsChanged { collection_id: String },
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CollectionEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event; returns how many listeners received it
    pub fn publish(&self, event: CollectionEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                log::debug!("Collection event dropped: no listeners");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CollectionEvent> {
        self.sender.subscribe()
    }
}

/// Handle to a registered listener task.
///
/// `unsubscribe` stops the listener; calling it again does nothing.
/// Dropping the handle unsubscribes as well.
#[derive(Debug)]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
    listeners: Arc<AtomicUsize>,
}

impl Subscription {
    pub(crate) fn new(task: JoinHandle<()>, listeners: Arc<AtomicUsize>) -> Self {
        listeners.fetch_add(1, Ordering::SeqCst);
        Self {
            task: Some(task),
            listeners,
        }
    }

    /// Stop listening. Returns `false` if already unsubscribed.
    pub fn unsubscribe(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                self.listeners.fetch_sub(1, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_listeners() {
        let bus = EventBus::default();
        let delivered = bus.publish(CollectionEvent::Deleted {
            id: "c1".to_string(),
        });
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let delivered = bus.publish(CollectionEvent::StatusChanged {
            id: "c1".to_string(),
            status: "syncing".to_string(),
        });

        assert_eq!(delivered, 1);
        assert_eq!(
            rx.recv().await.expect("event should arrive"),
            CollectionEvent::StatusChanged {
                id: "c1".to_string(),
                status: "syncing".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let listeners = Arc::new(AtomicUsize::new(0));
        let task = tokio::spawn(std::future::pending::<()>());
        let mut subscription = Subscription::new(task, Arc::clone(&listeners));
        assert_eq!(listeners.load(Ordering::SeqCst), 1);

        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert!(!subscription.is_active());
        assert_eq!(listeners.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let listeners = Arc::new(AtomicUsize::new(0));
        {
            let task = tokio::spawn(std::future::pending::<()>());
            let _subscription = Subscription::new(task, Arc::clone(&listeners));
            assert_eq!(listeners.load(Ordering::SeqCst), 1);
        }
        assert_eq!(listeners.load(Ordering::SeqCst), 0);
    }
}
