//! # airweave-dashboard
//!
//! Headless controller for the Airweave collections dashboard.
//!
//! The dashboard lists a user's collections, offers the source catalog for
//! creating new ones, shows the API key, and recovers from source
//! connections that failed in an external OAuth-style redirect. Nothing here
//! renders widgets: hosts drive a [`core::dashboard::Dashboard`] through
//! explicit inputs and read back view state and outbound UI events.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use airweave_dashboard::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> airweave_dashboard::Result<()> {
//!     let client = AirweaveClient::new("http://localhost:8001".to_string())?;
//!     let stores = StoreRegistry::init(Arc::new(client));
//!     let channel = ErrorChannel::new(Config::load(None)?.error_channel_path()?);
//!
//!     let (dashboard, _events) =
//!         Dashboard::new(stores, channel, Location::parse("/dashboard"), 3);
//!     dashboard.start();
//!     dashboard.wait_until_loaded().await;
//!     println!("{:?}", dashboard.view().collections.top);
//!     dashboard.stop();
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │            CLI host                 │  clap commands, table output
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  stores, dialog flow, dashboard
//! ├─────────────────────────────────────┤
//! │           API Layer                 │  HTTP client, response models
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  config file, error channel
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  retry, validation, logging
//! └─────────────────────────────────────┘
//! ```

pub use error::AppError;

/// Commonly used types in one import.
///
/// ```rust,ignore
/// use airweave_dashboard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::AppError;

    pub use crate::api::client::AirweaveClient;
    pub use crate::api::models::{ApiKey, Collection, Source, SourceConnection};

    pub use crate::core::dashboard::{Dashboard, ResumptionOutcome, Toast, UiEvent};
    pub use crate::core::dialog::{DialogOrigin, DialogState, Transition};
    pub use crate::core::events::{CollectionEvent, Subscription};
    pub use crate::core::navigation::Location;
    pub use crate::core::registry::StoreRegistry;
    pub use crate::core::traits::DashboardApi;

    pub use crate::storage::config::Config;
    pub use crate::storage::error_channel::{ErrorChannel, ResumedErrorDetails};
}

/// Command-line host: argument types, dispatcher and handlers
pub mod cli;

/// Shared stores, the dialog state machine and the dashboard controller
pub mod core;

/// Configuration file and the persistent connection-error channel
pub mod storage;

/// Retry, validation, error conversion and log setup
pub mod utils;

/// Airweave HTTP client and response models
pub mod api;

/// Table rendering for terminal hosts
pub mod display;

/// Hierarchical error types with severity and troubleshooting hints
pub mod error;

/// Crate-wide `Result` over [`AppError`]
pub type Result<T> = std::result::Result<T, AppError>;
