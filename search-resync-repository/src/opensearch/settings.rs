//! Index settings handling.
//!
//! The search service reports settings it assigned itself when an index was
//! created. Those must be stripped before the settings are sent back on
//! index creation, or the create request is rejected.

use serde_json::{json, Map, Value};

/// Server-assigned settings that must not be resubmitted.
pub const VOLATILE_SETTINGS_KEYS: [&str; 4] = ["uuid", "provided_name", "creation_date", "version"];

/// Return a copy of `settings` without the volatile keys.
///
/// Keys are removed from the top level and from the nested `index` object,
/// which is where the search service reports them. Everything else is kept
/// unchanged. Non-object settings are returned as they are.
pub fn filter_settings(settings: &Value) -> Value {
    let Value::Object(map) = settings else {
        return settings.clone();
    };

    let mut filtered = strip_volatile(map);
    if let Some(Value::Object(index)) = filtered.get("index") {
        let index = strip_volatile(index);
        filtered.insert("index".to_string(), Value::Object(index));
    }

    Value::Object(filtered)
}

fn strip_volatile(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| !VOLATILE_SETTINGS_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Body of an index creation request.
pub fn create_index_body(aliases: &Value, mappings: &Value, settings: &Value) -> Value {
    json!({
        "aliases": aliases,
        "mappings": mappings,
        "settings": settings
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_flat_settings() {
        let settings = json!({ "uuid": "x", "provided_name": "y", "custom": "z" });

        assert_eq!(filter_settings(&settings), json!({ "custom": "z" }));
    }

    #[test]
    fn test_filter_nested_index_settings() {
        let settings = json!({
            "index": {
                "uuid": "hQ3vmZ1rRk2",
                "provided_name": "cars",
                "creation_date": "1700000000000",
                "version": { "created": "136327827" },
                "number_of_shards": "1",
                "number_of_replicas": "1",
                "analysis": {
                    "analyzer": { "folded": { "tokenizer": "standard", "filter": ["asciifolding"] } }
                }
            }
        });

        let filtered = filter_settings(&settings);

        assert_eq!(
            filtered,
            json!({
                "index": {
                    "number_of_shards": "1",
                    "number_of_replicas": "1",
                    "analysis": {
                        "analyzer": { "folded": { "tokenizer": "standard", "filter": ["asciifolding"] } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_filter_leaves_nested_version_in_other_objects() {
        let settings = json!({ "index": { "mapping": { "version": 2 } } });

        assert_eq!(filter_settings(&settings), settings);
    }

    #[test]
    fn test_filter_non_object() {
        assert_eq!(filter_settings(&Value::Null), Value::Null);
    }

    #[test]
    fn test_create_index_body() {
        let body = create_index_body(
            &json!({ "cars-read": {} }),
            &json!({ "properties": { "make": { "type": "keyword" } } }),
            &json!({ "index": { "number_of_shards": "1" } }),
        );

        assert_eq!(body["aliases"], json!({ "cars-read": {} }));
        assert_eq!(body["mappings"]["properties"]["make"]["type"], "keyword");
        assert_eq!(body["settings"]["index"]["number_of_shards"], "1");
    }
}
