//! Storage layer
//!
//! TOML configuration and the persistent error channel that carries
//! connection failures across a full reload.

use crate::error::StorageError;

pub mod config;
pub mod error_channel;

type Result<T> = std::result::Result<T, StorageError>;

/// Directory holding this application's files under the platform config dir
pub(crate) fn app_config_dir() -> Result<std::path::PathBuf> {
    let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
    Ok(home_dir.join(".config").join("airweave-dash"))
}
