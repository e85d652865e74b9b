use super::traits::DashboardApi;
use crate::api::models::ApiKey;

/// API key panel state. A single optional value, not a cache.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ApiKeyState {
    #[default]
    Loading,
    Missing,
    Present(ApiKey),
}

impl ApiKeyState {
    pub fn key(&self) -> Option<&ApiKey> {
        match self {
            ApiKeyState::Present(key) => Some(key),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ApiKeyState::Loading)
    }
}

impl From<Option<ApiKey>> for ApiKeyState {
    fn from(key: Option<ApiKey>) -> Self {
        match key {
            Some(key) => ApiKeyState::Present(key),
            None => ApiKeyState::Missing,
        }
    }
}

/// First key the server reports, `None` on an empty list or any failure
pub async fn fetch_first_api_key(api: &dyn DashboardApi) -> Option<ApiKey> {
    match api.list_api_keys().await {
        Ok(keys) => keys.into_iter().next(),
        Err(e) => {
            log::warn!("Failed to load API key: {}", e);
            None
        }
    }
}
