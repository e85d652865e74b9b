use crate::api::models::{ApiKey, Collection, Source, SourceConnection};
use crate::error::ApiError;
use crate::utils::error_helpers::*;
use crate::utils::retry::{RetryConfig, RetryExecutor};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("airweave-dash/", env!("CARGO_PKG_VERSION"));

pub const COLLECTIONS_ENDPOINT: &str = "/collections/";
pub const SOURCES_ENDPOINT: &str = "/sources/list";
pub const SOURCE_CONNECTIONS_ENDPOINT: &str = "/source-connections/";
pub const API_KEYS_ENDPOINT: &str = "/api-keys";

#[derive(Debug, Clone)]
pub struct AirweaveClient {
    client: Client,
    pub base_url: String,
    pub api_key: Option<String>,
    timeout_secs: u64,
    retry: RetryConfig,
}

impl AirweaveClient {
    /// Client with the default timeout and no API key
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init", timeout_secs))?;

        Ok(AirweaveClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            timeout_secs,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_api_key(base_url: String, api_key: String) -> Result<Self, ApiError> {
        let mut client = AirweaveClient::new(base_url)?;
        client.api_key = Some(api_key);
        Ok(client)
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key.filter(|key| !key.is_empty());
    }

    pub fn set_retry(&mut self, retry: RetryConfig) {
        self.retry = retry;
    }

    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        request
    }

    /// List all collections visible to the caller, in server order
    pub async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        self.get_json(COLLECTIONS_ENDPOINT, &[]).await
    }

    /// List the catalog of available source types
    pub async fn list_sources(&self) -> Result<Vec<Source>, ApiError> {
        self.get_json(SOURCES_ENDPOINT, &[]).await
    }

    /// List the source connections attached to one collection
    pub async fn list_source_connections(
        &self,
        collection_id: &str,
    ) -> Result<Vec<SourceConnection>, ApiError> {
        self.get_json(SOURCE_CONNECTIONS_ENDPOINT, &[("collection", collection_id)])
            .await
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ApiError> {
        self.get_json(API_KEYS_ENDPOINT, &[]).await
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let described = describe_endpoint(path, query);
        let endpoint = described.as_str();
        let executor = RetryExecutor::new(self.retry.clone());

        executor
            .execute(move || async move {
                let response = self
                    .build_request(Method::GET, path)
                    .query(query)
                    .send()
                    .await
                    .map_err(|e| convert_request_error(e, endpoint, self.timeout_secs))?;
                Self::handle_response(response, endpoint, self.timeout_secs).await
            })
            .await
    }

    pub async fn handle_response<T>(
        response: Response,
        endpoint: &str,
        timeout_secs: u64,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let status = response.status().as_u16();

        if response.status().is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| convert_json_error(e, endpoint, status));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(convert_status_error(status, endpoint, body, timeout_secs))
    }
}

fn describe_endpoint(path: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", path, pairs.join("&"))
}
