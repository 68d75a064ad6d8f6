//! Kafka producer implementation for the search resync job.
//!
//! One producer client is shared by every entity; each entity gets a
//! `KafkaSender` bound to its topic.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    message::{Header, OwnedHeaders},
    producer::{FutureProducer, FutureRecord, Producer},
    util::Timeout,
};
use tracing::{debug, info, instrument};

use crate::errors::SinkError;
use crate::producer::MessageSender;
use search_resync_shared::OutboundMessage;

/// Header carrying the message identifier.
pub const MESSAGE_ID_HEADER: &str = "message-id";

/// Header carrying the body content type.
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// How long to wait for delivery reports or a flush.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// The Kafka client shared by all senders of a run.
pub struct KafkaProducerClient {
    producer: FutureProducer,
}

impl KafkaProducerClient {
    /// Create a new Kafka producer.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Kafka broker addresses (comma-separated)
    ///
    /// # Returns
    ///
    /// * `Ok(KafkaProducerClient)` - A new client instance
    /// * `Err(SinkError)` - If producer creation fails
    pub fn new(brokers: &str) -> Result<Self, SinkError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("client.id", "search-resync")
            .set("acks", "all")
            .set("compression.type", "zstd")
            .set("message.timeout.ms", "30000")
            .create()
            .map_err(|e| SinkError::client(e.to_string()))?;

        info!(brokers = %brokers, "Created Kafka producer");

        Ok(Self { producer })
    }

    /// Create a sender publishing to `topic` through this client.
    pub fn sender(&self, topic: impl Into<String>) -> KafkaSender {
        KafkaSender {
            producer: self.producer.clone(),
            topic: topic.into(),
        }
    }

    /// Flush anything still queued in the client.
    pub async fn close(&self) -> Result<(), SinkError> {
        flush(self.producer.clone()).await?;
        info!("Kafka producer closed");
        Ok(())
    }
}

/// Sender bound to one topic.
pub struct KafkaSender {
    producer: FutureProducer,
    topic: String,
}

/// Headers attached to every record.
fn message_headers(message: &OutboundMessage, id: &str) -> OwnedHeaders {
    OwnedHeaders::new()
        .insert(Header {
            key: MESSAGE_ID_HEADER,
            value: Some(id),
        })
        .insert(Header {
            key: CONTENT_TYPE_HEADER,
            value: Some(message.content_type),
        })
}

async fn flush(producer: FutureProducer) -> Result<(), SinkError> {
    tokio::task::spawn_blocking(move || producer.flush(Timeout::After(DELIVERY_TIMEOUT)))
        .await
        .map_err(|e| SinkError::close(e.to_string()))?
        .map_err(|e| SinkError::close(e.to_string()))
}

#[async_trait]
impl MessageSender for KafkaSender {
    fn destination(&self) -> &str {
        &self.topic
    }

    #[instrument(skip(self, message), fields(topic = %self.topic, message_id = %message.id))]
    async fn send(&self, message: &OutboundMessage) -> Result<(), SinkError> {
        let payload = message
            .payload()
            .map_err(|e| SinkError::serialization(e.to_string()))?;
        let id = message.id.to_string();

        let record = FutureRecord::to(&self.topic)
            .key(id.as_str())
            .payload(&payload)
            .headers(message_headers(message, &id));

        match self
            .producer
            .send(record, Timeout::After(DELIVERY_TIMEOUT))
            .await
        {
            Ok((partition, offset)) => {
                debug!(partition = partition, offset = offset, "Message delivered");
                Ok(())
            }
            Err((e, _)) => Err(SinkError::delivery(e.to_string())),
        }
    }

    async fn close(&self) -> Result<(), SinkError> {
        flush(self.producer.clone()).await?;
        debug!(topic = %self.topic, "Kafka sender closed");
        Ok(())
    }
}
