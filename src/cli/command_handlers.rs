use crate::api::client::AirweaveClient;
use crate::cli::main_types::{ConfigCommands, ErrorCommands};
use crate::core::dashboard::Dashboard;
use crate::core::navigation::Location;
use crate::core::registry::StoreRegistry;
use crate::core::traits::DashboardApi;
use crate::display::TableDisplay;
use crate::error::AppError;
use crate::storage::config::Config;
use crate::storage::error_channel::{ErrorChannel, ResumedErrorDetails};
use crate::utils::validation::validate_collection_id;
use std::path::PathBuf;
use std::sync::Arc;

/// Runs the dashboard controller once and prints what it shows
pub struct DashboardHandler {
    display: TableDisplay,
}

impl Default for DashboardHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardHandler {
    pub fn new() -> Self {
        Self {
            display: TableDisplay::new(),
        }
    }

    pub async fn show(
        &self,
        client: AirweaveClient,
        channel: ErrorChannel,
        location: &str,
        with_connections: bool,
        top_n: usize,
    ) -> Result<(), AppError> {
        let backend: Arc<dyn DashboardApi> = Arc::new(client);
        let stores = StoreRegistry::init(backend);
        let (dashboard, mut events) =
            Dashboard::new(stores, channel, Location::parse(location), top_n);

        dashboard.start();
        dashboard.wait_until_loaded().await;
        if with_connections {
            dashboard.load_connections_for_top_collections().await;
        }

        println!("{}", self.display.render_view(&dashboard.view()));

        let mut printed_header = false;
        while let Ok(event) = events.try_recv() {
            if !printed_header {
                println!();
                printed_header = true;
            }
            println!("{}", self.display.render_event(&event));
        }

        dashboard.stop();
        Ok(())
    }

    pub async fn connections(
        &self,
        client: AirweaveClient,
        collection_ids: &[String],
    ) -> Result<(), AppError> {
        for id in collection_ids {
            validate_collection_id(id)?;
        }

        let backend: Arc<dyn DashboardApi> = Arc::new(client);
        let stores = StoreRegistry::init(backend);
        let mapping = stores
            .collections
            .fetch_source_connections_for_collections(collection_ids)
            .await;

        let rendered: Vec<String> = collection_ids
            .iter()
            .map(|id| {
                let connections = mapping.get(id).map(|list| list.as_slice()).unwrap_or(&[]);
                self.display.render_connections(id, connections)
            })
            .collect();
        println!("{}", rendered.join("\n\n"));
        Ok(())
    }
}

/// Operates the stored connection error directly
#[derive(Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, command: ErrorCommands, channel: &ErrorChannel) -> Result<(), AppError> {
        match command {
            ErrorCommands::Write { service, message } => {
                let mut details = ResumedErrorDetails::for_service(service);
                if let Some(message) = message {
                    details = details.with_message(message);
                }
                channel.write(&details)?;
                println!("✅ Stored connection error for {}", details.summary());
                println!("Open the dashboard with '?connected=error' to resume it");
                Ok(())
            }
            ErrorCommands::Show => {
                match channel.read()? {
                    Some(details) => {
                        let body = serde_json::to_string_pretty(&details)
                            .map_err(|e| crate::error::ChannelError::Serialize(e.to_string()))?;
                        println!("{}", body);
                    }
                    None => println!("No connection error stored"),
                }
                Ok(())
            }
            ErrorCommands::Clear => {
                channel.clear()?;
                println!("✅ Connection error cleared");
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config: &Config,
        config_path: Option<PathBuf>,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                println!("Current Configuration:");
                println!("=====================");
                println!(
                    "URL: {}",
                    config.get_url().unwrap_or_else(|| "(not set)".to_string())
                );
                println!(
                    "API key: {}",
                    if config.get_api_key().is_some() {
                        "(set)"
                    } else {
                        "(not set)"
                    }
                );
                println!("Timeout: {} seconds", config.timeout_secs());
                println!("Max attempts: {}", config.max_retries());
                println!("Top collections: {}", config.top_collections());
                match config.error_channel_path() {
                    Ok(path) => println!("Error channel: {}", path.display()),
                    Err(e) => println!("Error channel: unavailable ({})", e),
                }
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let mut updated = config.clone();
                updated.set_value(&key, &value)?;
                updated.save(config_path)?;
                println!("✅ Set {}", key);
                Ok(())
            }
        }
    }
}
