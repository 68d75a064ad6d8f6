//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend.

mod client;
mod settings;

pub use client::OpenSearchClient;
pub use settings::{create_index_body, filter_settings, VOLATILE_SETTINGS_KEYS};
