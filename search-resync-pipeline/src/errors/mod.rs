//! Error types for the search resync pipeline.
//!
//! Surface errors (`SourceError`, `SinkError`, `SearchIndexError`) are wrapped
//! into a `PipelineError` carrying the entity context at the per-entity
//! boundary.

use std::fmt;

use search_resync_repository::SearchIndexError;
use thiserror::Error;

/// The phase of an entity's processing in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Delete-and-recreate of the search index.
    IndexReset,
    /// Reading the rows of the source table.
    Extraction,
    /// Publishing one message per row.
    Emission,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IndexReset => "index_reset",
            Self::Extraction => "extraction",
            Self::Emission => "emission",
        };
        f.write_str(name)
    }
}

/// Errors raised by a relational row source.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// Failed to reach the database.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The select statement failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// A row could not be decoded.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl SourceError {
    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}

impl From<sqlx::Error> for SourceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::ConnectionError(err.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::DecodeError(err.to_string())
            }
            _ => Self::QueryError(err.to_string()),
        }
    }
}

/// Errors raised by a message sender.
#[derive(Error, Debug, Clone)]
pub enum SinkError {
    /// Failed to create the messaging client.
    #[error("Client error: {0}")]
    ClientError(String),

    /// The message body could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The broker did not acknowledge the message.
    #[error("Delivery error: {0}")]
    DeliveryError(String),

    /// Pending messages could not be flushed on close.
    #[error("Close error: {0}")]
    CloseError(String),
}

impl SinkError {
    /// Create a client error.
    pub fn client(msg: impl Into<String>) -> Self {
        Self::ClientError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a delivery error.
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::DeliveryError(msg.into())
    }

    /// Create a close error.
    pub fn close(msg: impl Into<String>) -> Self {
        Self::CloseError(msg.into())
    }
}

/// A failure scoped to one entity.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// The index could not be reset.
    #[error("Index reset error for {index}: {source}")]
    IndexReset {
        index: String,
        source: SearchIndexError,
    },

    /// The source table could not be read.
    #[error("Extraction error for {table}: {source}")]
    Extraction { table: String, source: SourceError },

    /// A message could not be sent. `sent` rows were acknowledged before it.
    #[error("Emission error for {destination} after {sent} messages: {source}")]
    Emission {
        destination: String,
        sent: usize,
        source: SinkError,
    },
}

impl PipelineError {
    /// Create an index reset error.
    pub fn index_reset(index: impl Into<String>, source: SearchIndexError) -> Self {
        Self::IndexReset {
            index: index.into(),
            source,
        }
    }

    /// Create an extraction error.
    pub fn extraction(table: impl Into<String>, source: SourceError) -> Self {
        Self::Extraction {
            table: table.into(),
            source,
        }
    }

    /// Create an emission error.
    pub fn emission(destination: impl Into<String>, sent: usize, source: SinkError) -> Self {
        Self::Emission {
            destination: destination.into(),
            sent,
            source,
        }
    }

    /// The stage the error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            Self::IndexReset { .. } => Stage::IndexReset,
            Self::Extraction { .. } => Stage::Extraction,
            Self::Emission { .. } => Stage::Emission,
        }
    }
}
