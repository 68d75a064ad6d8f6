//! Postgres row source.

use async_trait::async_trait;
use pg_escape::quote_identifier;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use crate::errors::SourceError;
use crate::source::{ColumnCase, RowSource};
use search_resync_shared::SourceRow;

/// Connection settings shared by every source database.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: Option<SecretString>,
    /// Require TLS for every connection.
    pub require_ssl: bool,
    /// Connections kept open while idle.
    pub min_connections: u32,
    /// Upper bound on open connections per database.
    pub max_connections: u32,
}

impl PostgresConfig {
    /// Create a config with the default pool bounds (0..=5) and TLS required.
    pub fn new(host: impl Into<String>, port: u16, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: None,
            require_ssl: true,
            min_connections: 0,
            max_connections: 5,
        }
    }

    /// Connection options for one database.
    fn connect_options(&self, database: &str) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(database)
            .ssl_mode(ssl_mode);

        match &self.password {
            Some(password) => options.password(password.expose_secret()),
            None => options,
        }
    }
}

/// Row source backed by a lazily connected pool for one database.
pub struct PostgresRowSource {
    pool: PgPool,
    database: String,
    column_case: ColumnCase,
}

impl PostgresRowSource {
    /// Create a source for `database`.
    ///
    /// No connection is opened until the first query, so an unreachable
    /// database only fails the entity that reads from it.
    pub fn connect_lazy(config: &PostgresConfig, database: &str) -> Self {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .connect_lazy_with(config.connect_options(database));

        info!(
            host = %config.host,
            port = config.port,
            database = %database,
            "Created Postgres pool"
        );

        Self {
            pool,
            database: database.to_string(),
            column_case: ColumnCase::default(),
        }
    }

    /// Present column names with the given case.
    pub fn with_column_case(mut self, column_case: ColumnCase) -> Self {
        self.column_case = column_case;
        self
    }

    /// Statement selecting each row of `table` as one JSON object.
    fn select_all_statement(table: &str) -> String {
        format!(
            "SELECT row_to_json(t) AS row FROM {} AS t",
            quote_identifier(table)
        )
    }
}

#[async_trait]
impl RowSource for PostgresRowSource {
    #[instrument(skip(self), fields(database = %self.database))]
    async fn select_all(&self, table: &str) -> Result<Vec<SourceRow>, SourceError> {
        let statement = Self::select_all_statement(table);

        let rows: Vec<Json<SourceRow>> = sqlx::query_scalar(&statement)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Fetched rows");

        Ok(rows
            .into_iter()
            .map(|Json(row)| self.column_case.apply(row))
            .collect())
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!(database = %self.database, "Closed Postgres pool");
    }
}
