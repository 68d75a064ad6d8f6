//! Configuration types for the OpenSearch client.

use secrecy::SecretString;

/// Default OpenSearch URL.
pub const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Connection settings for the search service.
#[derive(Debug, Clone)]
pub struct OpenSearchConfig {
    /// The OpenSearch server URL.
    pub url: String,
    /// Basic-auth credentials. `None` connects anonymously.
    pub credentials: Option<(String, SecretString)>,
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OPENSEARCH_URL.to_string(),
            credentials: None,
        }
    }
}

impl OpenSearchConfig {
    /// Create a config for an anonymous connection to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
        }
    }

    /// Authenticate with basic-auth credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.credentials = Some((username.into(), password));
        self
    }
}
