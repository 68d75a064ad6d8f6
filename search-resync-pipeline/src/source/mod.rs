//! Source module for the search resync pipeline.
//!
//! Reads the current rows of an entity's source table.

mod case;
mod postgres;

use async_trait::async_trait;

use crate::errors::SourceError;
use search_resync_shared::SourceRow;

pub use case::ColumnCase;
pub use postgres::{PostgresConfig, PostgresRowSource};

/// A relational source holding the tables replayed by the job.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Read every column of every row currently in `table`.
    ///
    /// The full result set is returned at once, in the order the database
    /// produced it.
    async fn select_all(&self, table: &str) -> Result<Vec<SourceRow>, SourceError>;

    /// Release the underlying connections.
    async fn close(&self);
}
