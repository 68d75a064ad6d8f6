//! Producer module for the search resync pipeline.
//!
//! Provides the messaging surface used to publish "entity created" events.

mod kafka_producer;

use async_trait::async_trait;

use crate::errors::SinkError;
use search_resync_shared::OutboundMessage;

pub use kafka_producer::{KafkaProducerClient, KafkaSender};

/// Publishes messages to one destination.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Name of the queue or topic messages are published to.
    fn destination(&self) -> &str;

    /// Send one message and wait for the broker to acknowledge it.
    async fn send(&self, message: &OutboundMessage) -> Result<(), SinkError>;

    /// Release the sender once no more messages will be sent.
    async fn close(&self) -> Result<(), SinkError>;
}
