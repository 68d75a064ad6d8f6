//! Emitter module for the search resync pipeline.
//!
//! Turns extracted rows into messages and publishes them.

mod event_emitter;

pub use event_emitter::EventEmitter;
