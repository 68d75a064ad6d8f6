//! Configuration and dependency wiring for the search resync job.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::ResyncConfig;
