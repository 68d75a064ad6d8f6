//! Source rows and the messages built from them.

use serde_json::{Map, Value};
use uuid::Uuid;

/// One row of a source table, keyed by column name in column order.
pub type SourceRow = Map<String, Value>;

/// Content type of every outbound message body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// An "entity created" message for one source row.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    /// Unique identifier, generated per message.
    pub id: Uuid,
    /// Always [`JSON_CONTENT_TYPE`].
    pub content_type: &'static str,
    /// `{ envelope_field: row }`.
    pub body: Value,
}

impl OutboundMessage {
    /// Wrap a row in its envelope field under a fresh identifier.
    pub fn for_row(envelope_field: &str, row: SourceRow) -> Self {
        let mut body = Map::with_capacity(1);
        body.insert(envelope_field.to_string(), Value::Object(row));

        Self {
            id: Uuid::new_v4(),
            content_type: JSON_CONTENT_TYPE,
            body: Value::Object(body),
        }
    }

    /// Serialized body.
    pub fn payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.body)
    }
}
