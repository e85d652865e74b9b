//! Cache-backed resource store.
//!
//! A [`ResourceStore`] owns the cached listing of one resource type. Reads
//! are served from the cache; a miss or a forced refresh issues exactly one
//! network request no matter how many callers ask at the same time, and
//! every caller receives that request's result. Failures never escape: the
//! store logs them and hands back the last good snapshot (or an empty one).

use super::cache::SnapshotCache;
use super::traits::ResourceLoader;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

type PendingFetch<T> = Shared<BoxFuture<'static, Arc<Vec<T>>>>;

pub struct ResourceStore<T> {
    loader: Arc<dyn ResourceLoader<T>>,
    cache: SnapshotCache<T>,
    in_flight: Mutex<Option<PendingFetch<T>>>,
    loading: watch::Sender<bool>,
    version: watch::Sender<u64>,
    requests: AtomicU64,
}

impl<T> ResourceStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(loader: Arc<dyn ResourceLoader<T>>) -> Arc<Self> {
        Arc::new(Self {
            loader,
            cache: SnapshotCache::new(),
            in_flight: Mutex::new(None),
            loading: watch::Sender::new(false),
            version: watch::Sender::new(0),
            requests: AtomicU64::new(0),
        })
    }

    pub fn name(&self) -> &'static str {
        self.loader.resource_name()
    }

    /// Cached items, or a fresh load when the cache is empty or `force_refresh` is set.
    ///
    /// Callers arriving while a load is in flight join it instead of
    /// starting another, forced or not.
    pub async fn fetch(self: &Arc<Self>, force_refresh: bool) -> Arc<Vec<T>> {
        if !force_refresh {
            if let Some(items) = self.cache.get() {
                log::debug!("{}: cache hit ({} items)", self.name(), items.len());
                return items;
            }
        }

        self.join_or_start().await
    }

    fn join_or_start(self: &Arc<Self>) -> PendingFetch<T> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(pending) = in_flight.as_ref() {
            log::debug!("{}: joining in-flight request", self.name());
            return pending.clone();
        }

        // the load runs on its own task so it finishes even if every caller goes away
        let store = Arc::clone(self);
        let task = tokio::spawn(async move { store.load_and_store().await });
        let owner = Arc::clone(self);
        let pending = async move {
            match task.await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::warn!("{}: load task aborted: {}", owner.name(), e);
                    owner.settle();
                    owner.items()
                }
            }
        }
        .boxed()
        .shared();
        *in_flight = Some(pending.clone());
        self.loading.send_replace(true);
        pending
    }

    async fn load_and_store(&self) -> Arc<Vec<T>> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let snapshot = match self.loader.load().await {
            Ok(items) => {
                log::info!("{}: loaded {} items", self.name(), items.len());
                let snapshot = self.cache.replace(items);
                self.bump_version();
                snapshot
            }
            Err(e) => {
                log::warn!("{}: fetch failed, keeping cached data: {}", self.name(), e);
                self.cache.get().unwrap_or_default()
            }
        };

        self.settle();
        snapshot
    }

    fn settle(&self) {
        *self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        self.loading.send_replace(false);
    }

    /// Cached items without touching the network; empty before the first load
    pub fn items(&self) -> Arc<Vec<T>> {
        self.cache.get().unwrap_or_default()
    }

    pub fn cached(&self) -> Option<Arc<Vec<T>>> {
        self.cache.get()
    }

    pub fn is_populated(&self) -> bool {
        self.cache.is_populated()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Receiver that observes the loading flag
    pub fn loading_changes(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Number of successful cache replacements so far
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Receiver notified on every cache replacement
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Network requests issued over the store's lifetime
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Copy-on-write edit of the cached items
    pub(crate) fn patch<F>(&self, patch: F) -> bool
    where
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        let changed = self.cache.update(patch);
        if changed {
            self.bump_version();
        }
        changed
    }

    /// Drop cached data
    pub fn invalidate(&self) {
        self.cache.clear();
        self.bump_version();
    }

    fn bump_version(&self) {
        self.version.send_modify(|version| *version += 1);
    }
}
