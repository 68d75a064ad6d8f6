//! Index definition snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The shape of a search index as read from the search service.
///
/// Each part is kept as raw JSON so it can be resubmitted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Aliases pointing at the index.
    #[serde(default = "empty_object")]
    pub aliases: Value,
    /// Field mappings.
    #[serde(default = "empty_object")]
    pub mappings: Value,
    /// Index settings, including server-assigned ones.
    #[serde(default = "empty_object")]
    pub settings: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
