//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cluster::ClusterHealthParts,
    http::response::Response,
    http::StatusCode,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesGetParts},
    OpenSearch,
};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::OpenSearchConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::settings::create_index_body;
use search_resync_shared::IndexDefinition;

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new(&OpenSearchConfig::new("http://localhost:9200"))?;
/// let definition = client.get_index("cars").await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the configured URL.
    ///
    /// No request is made; use `health_check` to verify the connection.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or transport setup fails
    pub fn new(config: &OpenSearchConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some((username, password)) = &config.credentials {
            builder = builder.auth(Credentials::Basic(
                username.clone(),
                password.expose_secret().clone(),
            ));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            url = %config.url,
            authenticated = config.credentials.is_some(),
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Extract the definition of `index` from a get-index response body.
    ///
    /// The body is keyed by concrete index name. A name that resolves through
    /// an alias is keyed by the target index instead and is rejected.
    fn parse_definition(index: &str, mut body: Value) -> Result<IndexDefinition, SearchIndexError> {
        let entry = body
            .get_mut(index)
            .map(Value::take)
            .ok_or_else(|| {
                SearchIndexError::parse(format!("Response has no definition for index {}", index))
            })?;

        serde_json::from_value(entry).map_err(|e| {
            SearchIndexError::parse(format!("Invalid definition for index {}: {}", index, e))
        })
    }

    async fn error_body(response: Response) -> String {
        response.text().await.unwrap_or_default()
    }

    /// Whether a cluster health response reports a usable cluster.
    fn parse_health(status: StatusCode, body: &str) -> Result<bool, SearchIndexError> {
        if !status.is_success() {
            error!(status = %status, body = %body, "Cluster health request failed");
            return Err(SearchIndexError::connection(format!(
                "Cluster health failed with status {}: {}",
                status, body
            )));
        }

        let health: Value =
            serde_json::from_str(body).map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let cluster_status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        debug!(status = %cluster_status, "OpenSearch cluster status");
        Ok(cluster_status == "green" || cluster_status == "yellow")
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    #[instrument(skip(self))]
    async fn get_index(&self, index: &str) -> Result<IndexDefinition, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::get(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(index));
        }
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Get index request failed");
            return Err(SearchIndexError::get(format!(
                "Get index failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let definition = Self::parse_definition(index, body)?;
        debug!(index = %index, "Fetched index definition");
        Ok(definition)
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Delete index request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, "Index deleted");
        Ok(())
    }

    #[instrument(skip(self, aliases, mappings, settings))]
    async fn create_index(
        &self,
        index: &str,
        aliases: &Value,
        mappings: &Value,
        settings: &Value,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(create_index_body(aliases, mappings, settings))
            .send()
            .await
            .map_err(|e| SearchIndexError::create(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchIndexError::create(format!(
                "Create index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, "Index created");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        let body = Self::error_body(response).await;
        Self::parse_health(status, &body)
    }
}
