//! Terminal rendering for the CLI host

pub mod table;

pub use table::TableDisplay;
