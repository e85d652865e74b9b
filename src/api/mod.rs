//! API layer - Airweave HTTP client and response models

pub mod client;
pub mod models;
