//! Collections store: the collection list plus, per collection, its
//! source connections.

use super::cache::KeyedCache;
use super::events::{CollectionEvent, EventBus, Subscription};
use super::store::ResourceStore;
use super::traits::{CollectionsLoader, DashboardApi};
use crate::api::models::{Collection, SourceConnection};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch};

pub type SourceConnectionMap = HashMap<String, Arc<Vec<SourceConnection>>>;

pub struct CollectionsStore {
    list: Arc<ResourceStore<Collection>>,
    backend: Arc<dyn DashboardApi>,
    connections: KeyedCache<String, SourceConnection>,
    events: EventBus,
    listeners: Arc<AtomicUsize>,
}

impl CollectionsStore {
    pub fn new(backend: Arc<dyn DashboardApi>) -> Arc<Self> {
        let loader = Arc::new(CollectionsLoader(Arc::clone(&backend)));
        Arc::new(Self {
            list: ResourceStore::<Collection>::new(loader),
            backend,
            connections: KeyedCache::new(),
            events: EventBus::default(),
            listeners: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub async fn fetch(&self, force_refresh: bool) -> Arc<Vec<Collection>> {
        self.list.fetch(force_refresh).await
    }

    pub fn collections(&self) -> Arc<Vec<Collection>> {
        self.list.items()
    }

    pub fn list(&self) -> &Arc<ResourceStore<Collection>> {
        &self.list
    }

    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }

    pub fn loading_changes(&self) -> watch::Receiver<bool> {
        self.list.loading_changes()
    }

    pub fn changes(&self) -> watch::Receiver<u64> {
        self.list.changes()
    }

    /// Fetch the connections of one collection.
    ///
    /// A failure is logged and recorded as an empty list, so the key is
    /// always present in the mapping afterwards.
    pub async fn fetch_source_connections_for_collection(
        &self,
        collection_id: &str,
    ) -> Arc<Vec<SourceConnection>> {
        let connections = match self.backend.list_source_connections(collection_id).await {
            Ok(connections) => connections,
            Err(e) => {
                log::warn!(
                    "Failed to load source connections for collection {}: {}",
                    collection_id,
                    e
                );
                Vec::new()
            }
        };
        self.connections.insert(collection_id.to_string(), connections)
    }

    /// Fetch several collections' connections concurrently; each id is isolated
    pub async fn fetch_source_connections_for_collections(
        &self,
        collection_ids: &[String],
    ) -> SourceConnectionMap {
        let fetches = collection_ids.iter().map(|id| async move {
            let connections = self.fetch_source_connections_for_collection(id).await;
            (id.clone(), connections)
        });
        join_all(fetches).await.into_iter().collect()
    }

    /// Snapshot of every collection's connections fetched so far
    pub fn source_connections(&self) -> SourceConnectionMap {
        self.connections.snapshot()
    }

    pub fn source_connections_for(
        &self,
        collection_id: &str,
    ) -> Option<Arc<Vec<SourceConnection>>> {
        self.connections.get(&collection_id.to_string())
    }

    /// Publish a change notification to every subscribed store listener
    pub fn publish(&self, event: CollectionEvent) -> usize {
        self.events.publish(event)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }

    /// Start applying change notifications to the cache.
    ///
    /// Must be called inside a tokio runtime. The listener holds only a weak
    /// reference to the store and stops when the handle is unsubscribed or
    /// dropped.
    pub fn subscribe_to_events(self: &Arc<Self>) -> Subscription {
        let mut receiver = self.events.subscribe();
        let store: Weak<Self> = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        let Some(store) = store.upgrade() else { break };
                        store.apply_event(event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        let Some(store) = store.upgrade() else { break };
                        log::warn!("Missed {} collection events, refreshing", missed);
                        store.fetch(true).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        log::debug!("Subscribed to collection events");
        Subscription::new(task, Arc::clone(&self.listeners))
    }

    async fn apply_event(&self, event: CollectionEvent) {
        log::debug!("Applying collection event: {:?}", event);
        match event {
            CollectionEvent::Updated(updated) => {
                let patched = self.list.patch(|items| {
                    match items.iter_mut().find(|c| c.id == updated.id) {
                        Some(existing) if *existing != updated => {
                            *existing = updated;
                            true
                        }
                        _ => false,
                    }
                });
                if !patched {
                    log::debug!("Update for uncached or unchanged collection ignored");
                }
            }
            CollectionEvent::StatusChanged { id, status } => {
                self.list.patch(|items| {
                    match items.iter_mut().find(|c| c.id == id) {
                        Some(existing) if existing.status != status => {
                            existing.status = status;
                            true
                        }
                        _ => false,
                    }
                });
            }
            CollectionEvent::Created(_) => {
                self.list.fetch(true).await;
            }
            CollectionEvent::Deleted { id } => {
                self.connections.remove(&id);
                self.list.fetch(true).await;
            }
            CollectionEvent::SourceConnectionsChanged { collection_id } => {
                self.fetch_source_connections_for_collection(&collection_id)
                    .await;
            }
        }
    }

    /// Drop every cached list and mapping
    pub fn reset(&self) {
        self.list.invalidate();
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{FakeApi, collection, connection};
    use std::time::Duration;

    fn store_with(api: FakeApi) -> (Arc<FakeApi>, Arc<CollectionsStore>) {
        let api = Arc::new(api);
        let store = CollectionsStore::new(api.clone());
        (api, store)
    }

    async fn wait_for_change(changes: &mut watch::Receiver<u64>) {
        tokio::time::timeout(Duration::from_secs(2), changes.changed())
            .await
            .expect("cache should change in time")
            .expect("store should still exist");
    }

    #[tokio::test]
    async fn test_fetch_is_cached() {
        let (api, store) = store_with(FakeApi::with_data(
            vec![collection("c1", "Docs", "docs-1", "ready")],
            vec![],
        ));

        store.fetch(false).await;
        store.fetch(false).await;

        assert_eq!(api.collection_calls(), 1);
        assert_eq!(store.collections()[0].name, "Docs");
    }

    #[tokio::test]
    async fn test_connection_failure_is_isolated_per_collection() {
        let api = FakeApi::default();
        api.connections
            .lock()
            .unwrap()
            .insert("c1".to_string(), vec![connection("sc1", "notion", "c1")]);
        api.failing_connections
            .lock()
            .unwrap()
            .insert("c2".to_string());
        let (_api, store) = store_with(api);

        let map = store
            .fetch_source_connections_for_collections(&["c1".to_string(), "c2".to_string()])
            .await;

        assert_eq!(map["c1"].len(), 1);
        assert!(map["c2"].is_empty());

        let mapping = store.source_connections();
        assert_eq!(mapping["c1"][0].short_name, "notion");
        assert!(mapping.contains_key("c2"));
        assert!(mapping["c2"].is_empty());
    }

    #[tokio::test]
    async fn test_connections_fetched_on_demand_only() {
        let (api, store) = store_with(FakeApi::with_data(
            vec![
                collection("c1", "Docs", "docs-1", "ready"),
                collection("c2", "Tickets", "tickets-1", "ready"),
            ],
            vec![],
        ));

        store.fetch(false).await;
        assert_eq!(api.connection_calls.load(Ordering::SeqCst), 0);
        assert!(store.source_connections_for("c1").is_none());

        store.fetch_source_connections_for_collection("c1").await;
        assert_eq!(api.connection_calls.load(Ordering::SeqCst), 1);
        assert!(store.source_connections_for("c1").is_some());
        assert!(store.source_connections_for("c2").is_none());
    }

    #[tokio::test]
    async fn test_status_event_patches_cache() {
        let (api, store) = store_with(FakeApi::with_data(
            vec![collection("c1", "Docs", "docs-1", "syncing")],
            vec![],
        ));
        store.fetch(false).await;
        let mut changes = store.changes();
        let _subscription = store.subscribe_to_events();

        store.publish(CollectionEvent::StatusChanged {
            id: "c1".to_string(),
            status: "ready".to_string(),
        });
        wait_for_change(&mut changes).await;

        assert_eq!(store.collections()[0].status, "ready");
        assert_eq!(api.collection_calls(), 1);
    }

    #[tokio::test]
    async fn test_created_event_forces_refresh() {
        let (api, store) = store_with(FakeApi::with_data(
            vec![collection("c1", "Docs", "docs-1", "ready")],
            vec![],
        ));
        store.fetch(false).await;
        let mut changes = store.changes();
        let _subscription = store.subscribe_to_events();

        let created = collection("c2", "Tickets", "tickets-1", "ready");
        api.collections.lock().unwrap().push(created.clone());
        store.publish(CollectionEvent::Created(created));
        wait_for_change(&mut changes).await;

        assert_eq!(store.collections().len(), 2);
        assert_eq!(api.collection_calls(), 2);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_listening() {
        let (_api, store) = store_with(FakeApi::with_data(
            vec![collection("c1", "Docs", "docs-1", "syncing")],
            vec![],
        ));
        store.fetch(false).await;

        let mut subscription = store.subscribe_to_events();
        assert_eq!(store.listener_count(), 1);
        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert_eq!(store.listener_count(), 0);

        tokio::task::yield_now().await;
        store.publish(CollectionEvent::StatusChanged {
            id: "c1".to_string(),
            status: "ready".to_string(),
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.collections()[0].status, "syncing");
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let (_api, store) = store_with(FakeApi::with_data(
            vec![collection("c1", "Docs", "docs-1", "ready")],
            vec![],
        ));
        store.fetch(false).await;
        store.fetch_source_connections_for_collection("c1").await;

        store.reset();

        assert!(store.collections().is_empty());
        assert!(store.source_connections().is_empty());
    }
}
