//! Utils module - Shared utilities and helpers

/// Error conversion helpers for the HTTP layer
pub mod error_helpers;

/// Log subscriber setup for the binary
pub mod logging;

/// Retry with exponential backoff for API calls
pub mod retry;

/// Input validation
pub mod validation;
