use crate::api::client::AirweaveClient;
use crate::api::models::{ApiKey, Collection, Source, SourceConnection};
use crate::error::ApiError;
use async_trait::async_trait;
use std::sync::Arc;

/// Remote operations the dashboard depends on.
///
/// [`AirweaveClient`] is the production implementation; tests plug in
/// in-memory backends.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError>;

    async fn list_sources(&self) -> Result<Vec<Source>, ApiError>;

    async fn list_source_connections(
        &self,
        collection_id: &str,
    ) -> Result<Vec<SourceConnection>, ApiError>;

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ApiError>;
}

#[async_trait]
impl DashboardApi for AirweaveClient {
    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        AirweaveClient::list_collections(self).await
    }

    async fn list_sources(&self) -> Result<Vec<Source>, ApiError> {
        AirweaveClient::list_sources(self).await
    }

    async fn list_source_connections(
        &self,
        collection_id: &str,
    ) -> Result<Vec<SourceConnection>, ApiError> {
        AirweaveClient::list_source_connections(self, collection_id).await
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ApiError> {
        AirweaveClient::list_api_keys(self).await
    }
}

/// Loads the full listing a [`ResourceStore`](super::store::ResourceStore) caches
#[async_trait]
pub trait ResourceLoader<T>: Send + Sync {
    /// Short resource name used in log lines
    fn resource_name(&self) -> &'static str;

    async fn load(&self) -> Result<Vec<T>, ApiError>;
}

/// Collection listing through a shared backend
pub struct CollectionsLoader(pub Arc<dyn DashboardApi>);

/// Source catalog listing through a shared backend
pub struct SourcesLoader(pub Arc<dyn DashboardApi>);

#[async_trait]
impl ResourceLoader<Collection> for CollectionsLoader {
    fn resource_name(&self) -> &'static str {
        "collections"
    }

    async fn load(&self) -> Result<Vec<Collection>, ApiError> {
        self.0.list_collections().await
    }
}

#[async_trait]
impl ResourceLoader<Source> for SourcesLoader {
    fn resource_name(&self) -> &'static str {
        "sources"
    }

    async fn load(&self) -> Result<Vec<Source>, ApiError> {
        self.0.list_sources().await
    }
}
