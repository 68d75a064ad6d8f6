//! Reset module for the search resync pipeline.
//!
//! Empties a search index by deleting and recreating it with the same shape.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::PipelineError;
use search_resync_repository::{filter_settings, SearchIndexProvider};
use search_resync_shared::EntityDescriptor;

/// Resets search indices to an empty shell.
///
/// A reset reads the live definition, deletes the index, and creates it again
/// with the original aliases and mappings and the settings minus the
/// server-assigned keys.
pub struct IndexResetter {
    client: Arc<dyn SearchIndexProvider>,
}

impl IndexResetter {
    /// Create a new resetter with the given client.
    pub fn new(client: Arc<dyn SearchIndexProvider>) -> Self {
        Self { client }
    }

    /// Reset the index of one entity.
    ///
    /// If the definition cannot be read the index is left untouched. A
    /// failure after the delete leaves the index absent.
    #[instrument(skip(self, descriptor), fields(index = %descriptor.index_name))]
    pub async fn reset(&self, descriptor: &EntityDescriptor) -> Result<(), PipelineError> {
        let index = descriptor.index_name;
        let to_error = |e| PipelineError::index_reset(index, e);

        let definition = self.client.get_index(index).await.map_err(to_error)?;
        let settings = filter_settings(&definition.settings);

        info!("Clearing index");
        self.client.delete_index(index).await.map_err(to_error)?;
        self.client
            .create_index(index, &definition.aliases, &definition.mappings, &settings)
            .await
            .map_err(to_error)?;

        info!("Index cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{descriptor, IndexCall, MockIndexProvider};
    use search_resync_repository::SearchIndexError;
    use search_resync_shared::IndexDefinition;
    use serde_json::json;

    fn cars_definition() -> IndexDefinition {
        IndexDefinition {
            aliases: json!({ "vehicles": { "is_write_index": true } }),
            mappings: json!({ "properties": { "make": { "type": "keyword" } } }),
            settings: json!({
                "index": {
                    "uuid": "hQ3vmZ1rRk2",
                    "provided_name": "cars",
                    "creation_date": "1700000000000",
                    "version": { "created": "136327827" },
                    "number_of_shards": "1"
                }
            }),
        }
    }

    #[tokio::test]
    async fn test_reset_recreates_with_same_shape() {
        let client = Arc::new(MockIndexProvider::new().with_index("cars", cars_definition()));
        let resetter = IndexResetter::new(client.clone());

        resetter.reset(&descriptor("cars")).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], IndexCall::Get("cars".to_string()));
        assert_eq!(calls[1], IndexCall::Delete("cars".to_string()));

        let IndexCall::Create {
            index,
            aliases,
            mappings,
            settings,
        } = &calls[2]
        else {
            panic!("expected create, got {:?}", calls[2]);
        };
        let original = cars_definition();
        assert_eq!(index, "cars");
        assert_eq!(aliases, &original.aliases);
        assert_eq!(mappings, &original.mappings);
        assert_eq!(settings, &json!({ "index": { "number_of_shards": "1" } }));
    }

    #[tokio::test]
    async fn test_reset_submits_filtered_flat_settings() {
        let definition = IndexDefinition {
            aliases: json!({}),
            mappings: json!({}),
            settings: json!({ "uuid": "x", "provided_name": "y", "custom": "z" }),
        };
        let client = Arc::new(MockIndexProvider::new().with_index("library", definition));
        let resetter = IndexResetter::new(client.clone());

        resetter.reset(&descriptor("library")).await.unwrap();

        let created = client.created_settings("library").unwrap();
        assert_eq!(created, json!({ "custom": "z" }));
    }

    #[tokio::test]
    async fn test_missing_index_is_not_created() {
        let client = Arc::new(MockIndexProvider::new());
        let resetter = IndexResetter::new(client.clone());

        let error = resetter.reset(&descriptor("cars")).await.unwrap_err();

        assert!(matches!(
            error,
            PipelineError::IndexReset {
                source: SearchIndexError::IndexNotFound(_),
                ..
            }
        ));
        assert_eq!(client.calls(), vec![IndexCall::Get("cars".to_string())]);
    }

    #[tokio::test]
    async fn test_delete_failure_skips_create() {
        let client = Arc::new(
            MockIndexProvider::new()
                .with_index("cars", cars_definition())
                .failing_delete("cars"),
        );
        let resetter = IndexResetter::new(client.clone());

        let error = resetter.reset(&descriptor("cars")).await.unwrap_err();

        assert!(matches!(
            error,
            PipelineError::IndexReset {
                source: SearchIndexError::DeleteError(_),
                ..
            }
        ));
        assert!(client.created_settings("cars").is_none());
    }
}
