use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "airweave-dash")]
#[command(about = "Terminal host for the Airweave collections dashboard")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.toml
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Airweave API base URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[arg(long, global = true, env = "AIRWEAVE_API_KEY")]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and print the dashboard
    Show {
        /// Location the dashboard is opened at, e.g. "/dashboard?connected=error"
        #[arg(long, default_value = "/dashboard")]
        location: String,
        /// Also fetch source connections for the listed collections
        #[arg(long)]
        connections: bool,
    },
    /// Show source connections of collections
    Connections {
        /// Collection IDs
        #[arg(required = true)]
        collection_ids: Vec<String>,
    },
    /// Inspect or simulate the stored connection error
    Error {
        #[command(subcommand)]
        command: ErrorCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ErrorCommands {
    /// Store a connection error, as the external connection flow does
    Write {
        /// Service name the failure belongs to
        #[arg(long)]
        service: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Print the stored connection error
    Show,
    /// Remove the stored connection error
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}
