//! Orchestrator module for the search resync pipeline.
//!
//! Runs the index reset phase over every entity, then the extraction and
//! emission phase over every entity, isolating failures per entity.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::emitter::EventEmitter;
use crate::errors::{PipelineError, SinkError, Stage};
use crate::producer::MessageSender;
use crate::reset::IndexResetter;
use crate::source::RowSource;
use search_resync_repository::SearchIndexProvider;
use search_resync_shared::EntityDescriptor;

/// An entity descriptor together with its live handles.
///
/// Produced once by the initializer and only read by the orchestrator.
#[derive(Clone)]
pub struct EntityBinding {
    /// The static description of the entity.
    pub descriptor: EntityDescriptor,
    /// Source of the entity's rows.
    pub source: Arc<dyn RowSource>,
    /// Sender bound to the entity's destination.
    pub sender: Arc<dyn MessageSender>,
}

impl EntityBinding {
    /// Release the source connections and the sender.
    ///
    /// The source is closed even if closing the sender fails.
    pub async fn close(&self) -> Result<(), SinkError> {
        let sender = self.sender.close().await;
        self.source.close().await;
        sender
    }
}

/// Close every binding in order.
///
/// A failure does not stop the remaining bindings from closing; the first
/// error is returned once all of them are closed.
pub async fn close_bindings(bindings: &[EntityBinding]) -> Result<(), SinkError> {
    let mut first_error = None;

    for binding in bindings {
        if let Err(e) = binding.close().await {
            warn!(
                destination = %binding.sender.destination(),
                error = %e,
                "Failed to close sender"
            );
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Resetting,
    Synchronizing,
    Done,
}

/// Result of one phase for one entity.
#[derive(Debug)]
pub enum EntityStatus {
    /// The index was deleted and recreated.
    Reset,
    /// Every row was sent.
    Synchronized { sent: usize },
    /// The entity was skipped for the rest of the phase.
    Skipped { stage: Stage, error: PipelineError },
}

/// Outcome of one phase for one entity.
#[derive(Debug)]
pub struct EntityOutcome {
    /// Index name identifying the entity.
    pub entity: &'static str,
    pub status: EntityStatus,
}

impl EntityOutcome {
    fn skipped(entity: &'static str, error: PipelineError) -> Self {
        Self {
            entity,
            status: EntityStatus::Skipped {
                stage: error.stage(),
                error,
            },
        }
    }

    /// Whether the entity was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, EntityStatus::Skipped { .. })
    }
}

/// Summary of a complete run.
#[derive(Debug)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One outcome per entity for the reset phase, in registry order.
    pub resets: Vec<EntityOutcome>,
    /// One outcome per entity for the synchronization phase, in registry order.
    pub syncs: Vec<EntityOutcome>,
}

impl SyncReport {
    /// Total number of messages sent, including those of entities whose
    /// emission failed part way.
    pub fn messages_sent(&self) -> usize {
        self.syncs
            .iter()
            .map(|outcome| match &outcome.status {
                EntityStatus::Synchronized { sent } => *sent,
                EntityStatus::Skipped {
                    error: PipelineError::Emission { sent, .. },
                    ..
                } => *sent,
                _ => 0,
            })
            .sum()
    }

    /// Every skipped outcome of both phases.
    pub fn skipped(&self) -> impl Iterator<Item = &EntityOutcome> {
        self.resets
            .iter()
            .chain(self.syncs.iter())
            .filter(|outcome| outcome.is_skipped())
    }

    /// Whether every entity completed both phases.
    pub fn is_complete(&self) -> bool {
        self.skipped().next().is_none()
    }
}

/// Orchestrator that sequences the reset and synchronization phases.
///
/// Entities are processed one at a time in binding order. There is no
/// retry and no rollback; a failing entity is reported and skipped.
pub struct Orchestrator {
    resetter: IndexResetter,
    emitter: EventEmitter,
    phase: RunPhase,
}

impl Orchestrator {
    /// Create a new orchestrator using the given search client.
    pub fn new(search_client: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            resetter: IndexResetter::new(search_client),
            emitter: EventEmitter::new(),
            phase: RunPhase::Idle,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Run both phases over `bindings` and report per-entity outcomes.
    #[instrument(skip(self, bindings), fields(entity_count = bindings.len()))]
    pub async fn run(&mut self, bindings: &[EntityBinding]) -> SyncReport {
        let started_at = Utc::now();

        self.phase = RunPhase::Resetting;
        info!("Clearing indices");
        let resets = self.reset_indices(bindings).await;
        info!("Indices cleared");

        self.phase = RunPhase::Synchronizing;
        info!("Synchronizing indices");
        let syncs = self.synchronize(bindings).await;
        info!("Indices synchronized");

        self.phase = RunPhase::Done;

        SyncReport {
            started_at,
            finished_at: Utc::now(),
            resets,
            syncs,
        }
    }

    async fn reset_indices(&self, bindings: &[EntityBinding]) -> Vec<EntityOutcome> {
        let mut outcomes = Vec::with_capacity(bindings.len());

        for binding in bindings {
            let entity = binding.descriptor.index_name;
            let outcome = match self.resetter.reset(&binding.descriptor).await {
                Ok(()) => EntityOutcome {
                    entity,
                    status: EntityStatus::Reset,
                },
                Err(e) => {
                    error!(index = %entity, error = %e, "Failed to clear index");
                    EntityOutcome::skipped(entity, e)
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn synchronize(&self, bindings: &[EntityBinding]) -> Vec<EntityOutcome> {
        let mut outcomes = Vec::with_capacity(bindings.len());

        for binding in bindings {
            let entity = binding.descriptor.index_name;
            let outcome = match self.synchronize_entity(binding).await {
                Ok(sent) => EntityOutcome {
                    entity,
                    status: EntityStatus::Synchronized { sent },
                },
                Err(e) => {
                    error!(
                        table = %binding.descriptor.table_name,
                        stage = %e.stage(),
                        error = %e,
                        "Failed to synchronize table"
                    );
                    EntityOutcome::skipped(entity, e)
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Extract the rows of one entity and emit them.
    #[instrument(skip(self, binding), fields(table = %binding.descriptor.table_name))]
    async fn synchronize_entity(&self, binding: &EntityBinding) -> Result<usize, PipelineError> {
        let table = binding.descriptor.table_name;

        let rows = binding
            .source
            .select_all(table)
            .await
            .map_err(|e| PipelineError::extraction(table, e))?;

        info!(row_count = rows.len(), "Synchronizing table");
        if rows.is_empty() {
            warn!("Source table is empty");
        }

        let sent = self
            .emitter
            .emit(&binding.descriptor, binding.sender.as_ref(), rows)
            .await?;

        info!(sent = sent, "Table synchronized");
        Ok(sent)
    }
}
