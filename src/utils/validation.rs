//! Validation of configuration values and command arguments

use crate::error::{CliError, ConfigError};

/// Validate that a server URL is an absolute http(s) URL
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': unsupported scheme '{}'",
            url,
            parsed.scheme()
        ))
        .into()),
        Err(e) => Err(CliError::InvalidArguments(format!("Invalid URL '{}': {}", url, e)).into()),
    }
}

/// Validate that a numeric setting lies inside an inclusive range
pub fn validate_range(field: &str, value: u64, min: u64, max: u64) -> crate::Result<()> {
    if value < min || value > max {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("must be between {} and {}", min, max),
        }
        .into());
    }
    Ok(())
}

/// Validate a collection id passed on the command line
pub fn validate_collection_id(id: &str) -> crate::Result<()> {
    if id.trim().is_empty() {
        return Err(
            CliError::InvalidArguments("Collection id cannot be empty".to_string()).into(),
        );
    }
    Ok(())
}
