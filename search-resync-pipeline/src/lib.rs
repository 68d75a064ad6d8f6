//! # Search Resync Pipeline
//!
//! This crate provides the pipeline components that reset search indices
//! and replay the current rows of the source tables as events.
//!
//! ## Architecture
//!
//! 1. **Reset**: Deletes and recreates each index with its original shape
//! 2. **Source**: Reads every row of an entity's table from Postgres
//! 3. **Emitter**: Publishes one message per row through a producer
//! 4. **Orchestrator**: Runs both phases entity by entity, isolating failures

pub mod emitter;
pub mod errors;
pub mod orchestrator;
pub mod producer;
pub mod reset;
pub mod source;

#[cfg(test)]
mod test_support;

pub use errors::{PipelineError, SinkError, SourceError, Stage};
pub use orchestrator::{
    close_bindings, EntityBinding, EntityOutcome, EntityStatus, Orchestrator, RunPhase, SyncReport,
};
