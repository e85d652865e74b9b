use crate::api::client::AirweaveClient;
use crate::cli::command_handlers::{ConfigHandler, DashboardHandler, ErrorHandler};
use crate::cli::main_types::Commands;
use crate::error::{AppError, CliError};
use crate::storage::config::{Config, URL_ENV};
use crate::storage::error_channel::ErrorChannel;
use crate::utils::retry::RetryConfig;
use crate::utils::validation::validate_url;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_dir: Option<PathBuf>,
    url: Option<String>,
    api_key: Option<String>,
    verbose: bool,
}

impl Dispatcher {
    pub fn new(config: Config, config_dir: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            config,
            config_dir,
            url: None,
            api_key: None,
            verbose,
        }
    }

    /// Command-line values that take priority over env and config file
    pub fn with_overrides(mut self, url: Option<String>, api_key: Option<String>) -> Self {
        self.url = url.filter(|u| !u.is_empty());
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    fn config_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join("config.toml"))
    }

    fn resolve_url(&self) -> Result<String, AppError> {
        let url = self
            .url
            .clone()
            .or_else(|| self.config.get_url())
            .ok_or_else(|| CliError::MissingUrl {
                hint: format!(
                    "Pass --url, set {} or run 'airweave-dash config set url <URL>'",
                    URL_ENV
                ),
            })?;
        validate_url(&url)?;
        Ok(url.trim_end_matches('/').to_string())
    }

    fn build_client(&self) -> Result<AirweaveClient, AppError> {
        let url = self.resolve_url()?;
        let mut client = AirweaveClient::with_timeout(url, self.config.timeout_secs())?;
        client.set_api_key(self.api_key.clone().or_else(|| self.config.get_api_key()));
        client.set_retry(RetryConfig::with_max_retries(self.config.max_retries()));

        if self.verbose && !client.is_authenticated() {
            log::debug!("No API key configured, requests are sent unauthenticated");
        }
        Ok(client)
    }

    /// Explicit path from config, else next to config.toml when a config dir
    /// was given, else the default location
    fn error_channel(&self) -> Result<ErrorChannel, AppError> {
        if self.config.error_channel_path.is_none() {
            if let Some(dir) = &self.config_dir {
                return Ok(ErrorChannel::in_dir(dir));
            }
        }
        Ok(ErrorChannel::new(self.config.error_channel_path()?))
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Show {
                location,
                connections,
            } => {
                log::debug!("Showing dashboard at {}", location);
                let client = self.build_client()?;
                let channel = self.error_channel()?;
                DashboardHandler::new()
                    .show(
                        client,
                        channel,
                        &location,
                        connections,
                        self.config.top_collections(),
                    )
                    .await
            }
            Commands::Connections { collection_ids } => {
                let client = self.build_client()?;
                DashboardHandler::new()
                    .connections(client, &collection_ids)
                    .await
            }
            Commands::Error { command } => {
                let channel = self.error_channel()?;
                log::debug!("Using error channel {}", channel.path().display());
                ErrorHandler::new().handle(command, &channel)
            }
            Commands::Config { command } => {
                ConfigHandler::new().handle(command, &self.config, self.config_path())
            }
        }
    }
}
