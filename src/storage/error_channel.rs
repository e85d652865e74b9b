//! Persistent error channel
//!
//! A single durable slot that carries the details of a failed source
//! connection from the external OAuth completion flow back into the
//! dashboard after a full reload. The file is the only place the record
//! lives; every reader and writer goes through [`ErrorChannel`].
//!
//! At most one record is live: `write` replaces whatever is stored. A record
//! may be stale (left behind by an earlier failed attempt), so `read` is
//! allowed to come back empty or fail and callers must cope with both.

use crate::error::ChannelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fixed name of the slot
pub const CHANNEL_NAME: &str = "connection-error";
pub const CHANNEL_FILE: &str = "connection-error.json";

/// Diagnostic record left by the external connection flow.
///
/// Field names are camelCase on disk. Fields this crate does not know about
/// are kept in `extra` and written back unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumedErrorDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResumedErrorDetails {
    pub fn for_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: Some(service_name.into()),
            timestamp: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Text shown when the failure cannot be tied to a known source
    pub fn summary(&self) -> String {
        match (&self.service_name, &self.error_message) {
            (Some(service), Some(message)) => format!("{}: {}", service, message),
            (Some(service), None) => format!("Connection to {} failed", service),
            (None, Some(message)) => message.clone(),
            (None, None) => "Connection failed".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorChannel {
    path: PathBuf,
}

impl ErrorChannel {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Channel stored as `connection-error.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CHANNEL_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `details`, replacing any unread record
    pub fn write(&self, details: &ResumedErrorDetails) -> Result<(), ChannelError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let body = serde_json::to_string_pretty(details)
            .map_err(|e| ChannelError::Serialize(e.to_string()))?;

        // Write-then-rename so a reader never observes half a record
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|source| self.io_error(source))?;
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))?;

        log::debug!("Stored {} record in {}", CHANNEL_NAME, self.path.display());
        Ok(())
    }

    /// Stored record, if any. Does not consume it.
    pub fn read(&self) -> Result<Option<ResumedErrorDetails>, ChannelError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ChannelError::Corrupt {
                path: self.path.to_string_lossy().to_string(),
                message: e.to_string(),
            })
    }

    /// Remove the record. Clearing an empty channel succeeds.
    pub fn clear(&self) -> Result<(), ChannelError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("Cleared {} record", CHANNEL_NAME);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Read the record and clear the slot
    pub fn take(&self) -> Result<Option<ResumedErrorDetails>, ChannelError> {
        let details = self.read()?;
        if details.is_some() {
            self.clear()?;
        }
        Ok(details)
    }

    fn io_error(&self, source: std::io::Error) -> ChannelError {
        ChannelError::Io {
            path: self.path.to_string_lossy().to_string(),
            source,
        }
    }
}
