//! # Search Resync Repository
//!
//! This crate provides the trait and implementation used to reset search
//! indices. It includes definitions for errors, the index provider interface,
//! and a concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use config::OpenSearchConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::{filter_settings, OpenSearchClient, VOLATILE_SETTINGS_KEYS};
