//! Process-wide store registry.
//!
//! Every dashboard mount in a process shares one [`StoreRegistry`], so a
//! refresh triggered by one mount is visible to all of them. The registry
//! is created explicitly with [`StoreRegistry::init`] and torn down with
//! [`StoreRegistry::reset`]; nothing is created implicitly on access.

use super::collections::CollectionsStore;
use super::store::ResourceStore;
use super::traits::{DashboardApi, SourcesLoader};
use crate::api::models::Source;
use std::sync::{Arc, RwLock};

pub type SourcesStore = ResourceStore<Source>;

static GLOBAL: RwLock<Option<Arc<StoreRegistry>>> = RwLock::new(None);

pub struct StoreRegistry {
    backend: Arc<dyn DashboardApi>,
    pub collections: Arc<CollectionsStore>,
    pub sources: Arc<SourcesStore>,
}

impl StoreRegistry {
    /// Stand-alone registry, not installed as the process-wide instance
    pub fn new(backend: Arc<dyn DashboardApi>) -> Arc<Self> {
        let sources = SourcesStore::new(Arc::new(SourcesLoader(Arc::clone(&backend))));
        Arc::new(Self {
            collections: CollectionsStore::new(Arc::clone(&backend)),
            sources,
            backend,
        })
    }

    /// Process-wide registry, created on first call.
    ///
    /// Later calls return the existing instance and ignore `backend`.
    pub fn init(backend: Arc<dyn DashboardApi>) -> Arc<Self> {
        let mut global = GLOBAL
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match global.as_ref() {
            Some(existing) => Arc::clone(existing),
            None => {
                log::debug!("Initializing process-wide store registry");
                let registry = Self::new(backend);
                *global = Some(Arc::clone(&registry));
                registry
            }
        }
    }

    pub fn global() -> Option<Arc<Self>> {
        GLOBAL
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Discard the process-wide registry and its caches
    pub fn reset() {
        let previous = GLOBAL
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(registry) = previous {
            registry.collections.reset();
            registry.sources.invalidate();
        }
    }

    pub fn backend(&self) -> Arc<dyn DashboardApi> {
        Arc::clone(&self.backend)
    }
}
