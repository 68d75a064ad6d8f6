//! # Search Resync Shared
//!
//! Shared types for the search resync job: the static entity registry,
//! the index definition snapshot, source rows and outbound messages.

pub mod index;
pub mod message;
pub mod registry;

pub use index::IndexDefinition;
pub use message::{OutboundMessage, SourceRow, JSON_CONTENT_TYPE};
pub use registry::{EntityDescriptor, ENTITY_REGISTRY};
