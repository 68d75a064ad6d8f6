//! Search index provider trait definition.
//!
//! This module defines the abstract interface for index management,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use search_resync_shared::IndexDefinition;

/// Abstracts the underlying search service used to reset indices.
///
/// Implementations are shared by every entity of a run, so they must be
/// `Send + Sync`. All methods return `Result<T, SearchIndexError>` for
/// consistent error handling across backends.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Read the live definition of an index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    ///
    /// # Returns
    ///
    /// * `Ok(IndexDefinition)` - Aliases, mappings and settings as stored
    /// * `Err(SearchIndexError::IndexNotFound)` - If the index does not exist
    /// * `Err(SearchIndexError)` - If the request fails
    async fn get_index(&self, index: &str) -> Result<IndexDefinition, SearchIndexError>;

    /// Delete an index and every document in it.
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Create an index with the given aliases, mappings and settings.
    ///
    /// The values are submitted as given; callers are responsible for
    /// removing server-assigned settings first.
    async fn create_index(
        &self,
        index: &str,
        aliases: &Value,
        mappings: &Value,
        settings: &Value,
    ) -> Result<(), SearchIndexError>;

    /// Check if the search service is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster is green or yellow
    /// * `Ok(false)` - If the cluster is red
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
