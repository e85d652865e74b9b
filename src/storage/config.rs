//! Configuration management
//!
//! Priority: CLI argument > environment variable > config.toml > defaults

use super::Result;
use crate::error::{ConfigError, StorageError};
use crate::utils::validation::{validate_range, validate_url};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const URL_ENV: &str = "AIRWEAVE_URL";
pub const API_KEY_ENV: &str = "AIRWEAVE_API_KEY";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TOP_COLLECTIONS: usize = 3;

const TIMEOUT_RANGE: (u64, u64) = (1, 300);
const MAX_RETRIES_RANGE: (u64, u64) = (1, 10);
const TOP_COLLECTIONS_RANGE: (u64, u64) = (1, 50);

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Airweave API base URL
    pub url: Option<String>,
    /// API key sent as `x-api-key`
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    /// Location of the persisted connection-error slot
    pub error_channel_path: Option<PathBuf>,
    /// How many collections the dashboard highlights
    pub top_collections: Option<usize>,
}

impl Config {
    /// Load configuration from file, defaults when the file does not exist
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to parse config file: {}", e),
        })
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(super::app_config_dir()?.join("config.toml"))
    }

    /// `AIRWEAVE_URL` when set, otherwise the file value
    pub fn get_url(&self) -> Option<String> {
        env_over_file(std::env::var(URL_ENV).ok(), &self.url)
    }

    /// `AIRWEAVE_API_KEY` when set, otherwise the file value
    pub fn get_api_key(&self) -> Option<String> {
        env_over_file(std::env::var(API_KEY_ENV).ok(), &self.api_key)
    }

    // hand-edited files bypass set_value, so the ranges are enforced on read too
    pub fn timeout_secs(&self) -> u64 {
        clamped(
            "timeout_secs",
            self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            TIMEOUT_RANGE,
        )
    }

    pub fn max_retries(&self) -> u32 {
        let retries = self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        clamped("max_retries", u64::from(retries), MAX_RETRIES_RANGE) as u32
    }

    pub fn top_collections(&self) -> usize {
        let top = self.top_collections.unwrap_or(DEFAULT_TOP_COLLECTIONS);
        clamped("top_collections", top as u64, TOP_COLLECTIONS_RANGE) as usize
    }

    /// Error channel location, the app config dir when unset
    pub fn error_channel_path(&self) -> Result<PathBuf> {
        match &self.error_channel_path {
            Some(path) => Ok(path.clone()),
            None => Ok(super::app_config_dir()?.join(super::error_channel::CHANNEL_FILE)),
        }
    }

    /// Set a single field from its textual form (used by `config set`)
    pub fn set_value(&mut self, key: &str, value: &str) -> crate::Result<()> {
        match key {
            "url" => {
                validate_url(value)?;
                self.url = Some(value.trim_end_matches('/').to_string());
            }
            "api_key" => {
                self.api_key = Some(value.to_string()).filter(|v| !v.is_empty());
            }
            "timeout_secs" => {
                let secs = parse_number(key, value)?;
                validate_range(key, secs, TIMEOUT_RANGE.0, TIMEOUT_RANGE.1)?;
                self.timeout_secs = Some(secs);
            }
            "max_retries" => {
                let retries = parse_number(key, value)?;
                validate_range(key, retries, MAX_RETRIES_RANGE.0, MAX_RETRIES_RANGE.1)?;
                self.max_retries = Some(retries as u32);
            }
            "top_collections" => {
                let top = parse_number(key, value)?;
                validate_range(key, top, TOP_COLLECTIONS_RANGE.0, TOP_COLLECTIONS_RANGE.1)?;
                self.top_collections = Some(top as usize);
            }
            "error_channel_path" => {
                self.error_channel_path = Some(PathBuf::from(value));
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: key.to_string(),
                    value: value.to_string(),
                    reason: "unknown configuration key".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

fn env_over_file(env: Option<String>, file: &Option<String>) -> Option<String> {
    env.filter(|v| !v.is_empty())
        .or_else(|| file.clone().filter(|v| !v.is_empty()))
}

fn clamped(field: &str, value: u64, (min, max): (u64, u64)) -> u64 {
    let bounded = value.clamp(min, max);
    if bounded != value {
        log::warn!(
            "Configured {} = {} is outside {}..={}, using {}",
            field,
            value,
            min,
            max,
            bounded
        );
    }
    bounded
}

fn parse_number(field: &str, value: &str) -> crate::Result<u64> {
    value.parse::<u64>().map_err(|_| {
        crate::AppError::from(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected a positive integer".to_string(),
        })
    })
}
