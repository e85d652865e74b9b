//! Dashboard core: shared stores, the dialog state machine and the
//! controller that composes them.

pub mod api_key;
pub mod cache;
pub mod collections;
pub mod dashboard;
pub mod dialog;
pub mod events;
pub mod navigation;
pub mod registry;
pub mod store;
pub mod traits;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;
