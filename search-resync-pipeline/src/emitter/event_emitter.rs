//! Event emitter implementation.
//!
//! Publishes one "entity created" message per source row.

use tracing::{debug, info, instrument};

use crate::errors::PipelineError;
use crate::producer::MessageSender;
use search_resync_shared::{EntityDescriptor, OutboundMessage, SourceRow};

/// Publishes rows as messages, one at a time.
///
/// Each send is awaited before the next row is built, so rows reach the
/// destination in extraction order. The first failed send abandons the rest
/// of the rows.
#[derive(Debug, Default)]
pub struct EventEmitter;

impl EventEmitter {
    /// Create a new event emitter.
    pub fn new() -> Self {
        Self
    }

    /// Emit every row of one entity.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - The number of messages sent, equal to `rows.len()`
    /// * `Err(PipelineError::Emission)` - If a send fails; `sent` counts the
    ///   messages acknowledged before the failure
    #[instrument(
        skip(self, descriptor, sender, rows),
        fields(destination = %sender.destination(), row_count = rows.len())
    )]
    pub async fn emit(
        &self,
        descriptor: &EntityDescriptor,
        sender: &dyn MessageSender,
        rows: Vec<SourceRow>,
    ) -> Result<usize, PipelineError> {
        let mut sent = 0;

        for row in rows {
            let message = OutboundMessage::for_row(descriptor.envelope_field, row);

            sender.send(&message).await.map_err(|e| {
                PipelineError::emission(sender.destination(), sent, e)
            })?;

            sent += 1;
            debug!(message_id = %message.id, "Message sent");
        }

        info!(sent = sent, "Rows emitted");
        Ok(sent)
    }
}
