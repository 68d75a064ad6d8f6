//! # Search Resync
//!
//! Main library for the search resync job.
//!
//! This crate provides the configuration, connection setup and entry point
//! that reset every search index and replay the source tables as
//! entity-created events.

pub mod config;
pub mod logging;

pub use config::{Dependencies, ResyncConfig};

use search_resync_pipeline::{EntityStatus, Orchestrator, SyncReport};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while setting up or tearing down a run.
///
/// Per-entity failures never surface here; they are part of the `SyncReport`.
#[derive(Error, Debug)]
pub enum ResyncError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search service error.
    #[error("Search error: {0}")]
    SearchError(#[from] search_resync_repository::SearchIndexError),

    /// Messaging error.
    #[error("Messaging error: {0}")]
    SinkError(#[from] search_resync_pipeline::SinkError),
}

impl ResyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Connect, run both phases over the registry, and release every connection.
///
/// Connections are released whether or not entities failed.
pub async fn run(config: &ResyncConfig) -> Result<SyncReport, ResyncError> {
    let dependencies = Dependencies::new(config).await?;

    let mut orchestrator = Orchestrator::new(dependencies.search_client.clone());
    let report = orchestrator.run(&dependencies.bindings).await;

    log_report(&report);
    dependencies.shutdown().await?;

    Ok(report)
}

fn log_report(report: &SyncReport) {
    for outcome in report.skipped() {
        if let EntityStatus::Skipped { stage, error } = &outcome.status {
            warn!(entity = %outcome.entity, stage = %stage, error = %error, "Entity skipped");
        }
    }

    let elapsed = report.finished_at - report.started_at;
    info!(
        messages_sent = report.messages_sent(),
        skipped = report.skipped().count(),
        elapsed_ms = elapsed.num_milliseconds(),
        "Resync finished"
    );
}
