//! Dependency initialization and wiring for the search resync job.

use std::sync::Arc;
use tracing::info;

use crate::config::ResyncConfig;
use crate::ResyncError;
use search_resync_pipeline::{
    close_bindings, producer::KafkaProducerClient, source::PostgresRowSource, EntityBinding,
};
use search_resync_repository::{OpenSearchClient, SearchIndexProvider};
use search_resync_shared::{EntityDescriptor, ENTITY_REGISTRY};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The search client shared by every entity.
    pub search_client: Arc<dyn SearchIndexProvider>,
    /// One binding per registry entry, in registry order.
    pub bindings: Vec<EntityBinding>,
    producer: KafkaProducerClient,
}

impl Dependencies {
    /// Initialize all dependencies for the built-in registry.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ResyncError)` - If initialization fails
    pub async fn new(config: &ResyncConfig) -> Result<Self, ResyncError> {
        Self::for_entities(config, ENTITY_REGISTRY).await
    }

    /// Initialize all dependencies for the given entities.
    pub async fn for_entities(
        config: &ResyncConfig,
        entities: &[EntityDescriptor],
    ) -> Result<Self, ResyncError> {
        info!(
            opensearch_url = %config.opensearch.url,
            pg_host = %config.postgres.host,
            kafka_broker = %config.kafka_broker,
            entity_count = entities.len(),
            "Initializing dependencies"
        );

        let search_client = OpenSearchClient::new(&config.opensearch)?;

        // Verify OpenSearch is reachable
        let healthy = search_client.health_check().await?;
        if !healthy {
            return Err(ResyncError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let producer = KafkaProducerClient::new(&config.kafka_broker)?;

        let bindings = entities
            .iter()
            .map(|descriptor| {
                let source = PostgresRowSource::connect_lazy(&config.postgres, descriptor.database);
                let sender = producer.sender(descriptor.destination_name(&config.destination_suffix));

                EntityBinding {
                    descriptor: *descriptor,
                    source: Arc::new(source),
                    sender: Arc::new(sender),
                }
            })
            .collect();

        Ok(Self {
            search_client: Arc::new(search_client),
            bindings,
            producer,
        })
    }

    /// Release every connection and sender.
    ///
    /// All bindings are closed before the first error is returned.
    pub async fn shutdown(self) -> Result<(), ResyncError> {
        let bindings = close_bindings(&self.bindings).await;
        self.producer.close().await?;
        info!("Dependencies shut down");

        bindings.map_err(ResyncError::from)
    }
}
