//! Run configuration read from the environment.

use secrecy::SecretString;
use std::env;

use crate::ResyncError;
use search_resync_pipeline::source::PostgresConfig;
use search_resync_repository::config::DEFAULT_OPENSEARCH_URL;
use search_resync_repository::OpenSearchConfig;

/// Default Postgres host.
const DEFAULT_PG_HOST: &str = "localhost";

/// Default Postgres port.
const DEFAULT_PG_PORT: u16 = 5432;

/// Default Kafka broker address.
const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";

/// Everything a run needs to connect to its collaborators.
#[derive(Debug, Clone)]
pub struct ResyncConfig {
    /// Search service connection.
    pub opensearch: OpenSearchConfig,
    /// Connection shared by every source database.
    pub postgres: PostgresConfig,
    /// Kafka bootstrap servers.
    pub kafka_broker: String,
    /// Appended to every destination name.
    pub destination_suffix: String,
}

impl ResyncConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_USERNAME`, `OPENSEARCH_PASSWORD`: basic-auth credentials (optional)
    /// - `PG_HOST`, `PG_PORT`: Postgres server (default: localhost:5432)
    /// - `PG_USERNAME`: Postgres user (required)
    /// - `PG_PASSWORD`: Postgres password (optional)
    /// - `PG_SSL`: require TLS (default: true)
    /// - `KAFKA_BROKER`: Kafka broker address (default: localhost:9092)
    /// - `DESTINATION_SUFFIX`: suffix of every destination name (required)
    pub fn from_env() -> Result<Self, ResyncError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ResyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| value(key).ok_or_else(|| ResyncError::config(format!("{} is not set", key)));

        let url = value("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string());
        let mut opensearch = OpenSearchConfig::new(url);
        if let Some(username) = value("OPENSEARCH_USERNAME") {
            let password = value("OPENSEARCH_PASSWORD").unwrap_or_default();
            opensearch = opensearch.with_credentials(username, SecretString::new(password));
        }

        let port = match value("PG_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| ResyncError::config(format!("Invalid PG_PORT {:?}: {}", port, e)))?,
            None => DEFAULT_PG_PORT,
        };
        let require_ssl = match value("PG_SSL") {
            Some(flag) => parse_flag(&flag)
                .ok_or_else(|| ResyncError::config(format!("Invalid PG_SSL {:?}", flag)))?,
            None => true,
        };

        let mut postgres = PostgresConfig::new(
            value("PG_HOST").unwrap_or_else(|| DEFAULT_PG_HOST.to_string()),
            port,
            required("PG_USERNAME")?,
        );
        postgres.password = value("PG_PASSWORD").map(SecretString::new);
        postgres.require_ssl = require_ssl;

        Ok(Self {
            opensearch,
            postgres,
            kafka_broker: value("KAFKA_BROKER").unwrap_or_else(|| DEFAULT_KAFKA_BROKER.to_string()),
            destination_suffix: required("DESTINATION_SUFFIX")?,
        })
    }
}

fn parse_flag(flag: &str) -> Option<bool> {
    match flag.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
