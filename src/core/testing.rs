//! In-memory backend shared by unit tests

use super::traits::DashboardApi;
use crate::api::models::{ApiKey, Collection, Source, SourceConnection};
use crate::error::ApiError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) fn collection(id: &str, name: &str, readable_id: &str, status: &str) -> Collection {
    Collection {
        id: id.to_string(),
        name: name.to_string(),
        readable_id: readable_id.to_string(),
        status: status.to_string(),
    }
}

pub(crate) fn source(id: &str, name: &str, short_name: &str) -> Source {
    Source {
        id: id.to_string(),
        name: name.to_string(),
        short_name: short_name.to_string(),
        description: None,
        labels: vec![],
    }
}

pub(crate) fn connection(id: &str, short_name: &str, collection_id: &str) -> SourceConnection {
    SourceConnection {
        id: id.to_string(),
        name: format!("{} connection", short_name),
        short_name: short_name.to_string(),
        collection: collection_id.to_string(),
        status: Some("active".to_string()),
    }
}

fn scripted_error(endpoint: &str) -> ApiError {
    ApiError::Http {
        status: 500,
        endpoint: endpoint.to_string(),
        message: "scripted failure".to_string(),
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    pub collections: Mutex<Vec<Collection>>,
    pub sources: Mutex<Vec<Source>>,
    pub connections: Mutex<HashMap<String, Vec<SourceConnection>>>,
    pub api_keys: Mutex<Vec<ApiKey>>,
    pub failing_connections: Mutex<HashSet<String>>,
    pub fail_collections: AtomicBool,
    pub fail_sources: AtomicBool,
    pub fail_api_keys: AtomicBool,
    pub sources_delay: Mutex<Duration>,
    pub collection_calls: AtomicUsize,
    pub source_calls: AtomicUsize,
    pub connection_calls: AtomicUsize,
    pub api_key_calls: AtomicUsize,
}

impl FakeApi {
    pub(crate) fn with_data(collections: Vec<Collection>, sources: Vec<Source>) -> Self {
        let api = Self::default();
        *api.collections.lock().unwrap() = collections;
        *api.sources.lock().unwrap() = sources;
        api
    }

    pub(crate) fn collection_calls(&self) -> usize {
        self.collection_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn source_calls(&self) -> usize {
        self.source_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        self.collection_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_collections.load(Ordering::SeqCst) {
            return Err(scripted_error("/collections/"));
        }
        Ok(self.collections.lock().unwrap().clone())
    }

    async fn list_sources(&self) -> Result<Vec<Source>, ApiError> {
        self.source_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.sources_delay.lock().unwrap();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
        if self.fail_sources.load(Ordering::SeqCst) {
            return Err(scripted_error("/sources/list"));
        }
        Ok(self.sources.lock().unwrap().clone())
    }

    async fn list_source_connections(
        &self,
        collection_id: &str,
    ) -> Result<Vec<SourceConnection>, ApiError> {
        self.connection_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.failing_connections.lock().unwrap().contains(collection_id) {
            return Err(scripted_error("/source-connections/"));
        }
        Ok(self
            .connections
            .lock()
            .unwrap()
            .get(collection_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ApiError> {
        self.api_key_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_api_keys.load(Ordering::SeqCst) {
            return Err(scripted_error("/api-keys"));
        }
        Ok(self.api_keys.lock().unwrap().clone())
    }
}
