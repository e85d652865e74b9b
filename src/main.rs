use airweave_dashboard::cli::dispatcher::Dispatcher;
use airweave_dashboard::cli::main_types::Cli;
use airweave_dashboard::storage::config::Config;
use airweave_dashboard::utils::logging;
use clap::Parser;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_dir = cli.config_dir.as_ref().map(PathBuf::from);
    let config_path = config_dir.as_ref().map(|dir| dir.join("config.toml"));

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if let Some(dir) = &config_dir {
        log::debug!("Using config directory: {}", dir.display());
    }
    if cli.api_key.as_ref().is_some_and(|key| !key.is_empty()) {
        log::debug!("Using API key provided via env or command line");
    }

    let dispatcher =
        Dispatcher::new(config, config_dir, cli.verbose).with_overrides(cli.url, cli.api_key);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("Error [{}]: {}", e.severity().label(), e.display_friendly());
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }

    Ok(())
}
