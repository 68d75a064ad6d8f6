//! Mock surfaces shared by the pipeline tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{SinkError, SourceError};
use crate::orchestrator::EntityBinding;
use crate::producer::MessageSender;
use crate::source::RowSource;
use search_resync_repository::{SearchIndexError, SearchIndexProvider};
use search_resync_shared::{
    EntityDescriptor, IndexDefinition, OutboundMessage, SourceRow, ENTITY_REGISTRY,
};

/// The registry descriptor for `index_name`.
pub fn descriptor(index_name: &str) -> EntityDescriptor {
    *ENTITY_REGISTRY
        .iter()
        .find(|d| d.index_name == index_name)
        .unwrap_or_else(|| panic!("no descriptor for {index_name}"))
}

/// Rows from JSON objects.
pub fn rows(values: Vec<Value>) -> Vec<SourceRow> {
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(map) => map,
            other => panic!("row must be an object, got {other}"),
        })
        .collect()
}

/// A plain index definition.
pub fn definition() -> IndexDefinition {
    IndexDefinition {
        aliases: json!({}),
        mappings: json!({ "properties": { "id": { "type": "long" } } }),
        settings: json!({ "index": { "uuid": "abc", "number_of_shards": "1" } }),
    }
}

pub fn binding(
    descriptor: EntityDescriptor,
    source: MockRowSource,
    sender: MockSender,
) -> EntityBinding {
    EntityBinding {
        descriptor,
        source: Arc::new(source),
        sender: Arc::new(sender),
    }
}

/// Ordered log of calls across mocks.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndexCall {
    Get(String),
    Delete(String),
    Create {
        index: String,
        aliases: Value,
        mappings: Value,
        settings: Value,
    },
}

/// Search index provider backed by a map of definitions.
#[derive(Default)]
pub struct MockIndexProvider {
    definitions: Mutex<HashMap<String, IndexDefinition>>,
    failing_deletes: HashSet<String>,
    calls: Mutex<Vec<IndexCall>>,
    journal: Journal,
}

impl MockIndexProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(self, index: &str, definition: IndexDefinition) -> Self {
        self.definitions
            .lock()
            .unwrap()
            .insert(index.to_string(), definition);
        self
    }

    pub fn failing_delete(mut self, index: &str) -> Self {
        self.failing_deletes.insert(index.to_string());
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn calls(&self) -> Vec<IndexCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Settings of the last create call for `index`.
    pub fn created_settings(&self, index: &str) -> Option<Value> {
        self.calls().into_iter().rev().find_map(|call| match call {
            IndexCall::Create {
                index: created,
                settings,
                ..
            } if created == index => Some(settings),
            _ => None,
        })
    }
}

#[async_trait]
impl SearchIndexProvider for MockIndexProvider {
    async fn get_index(&self, index: &str) -> Result<IndexDefinition, SearchIndexError> {
        self.calls.lock().unwrap().push(IndexCall::Get(index.to_string()));
        self.journal.record(format!("get {index}"));

        self.definitions
            .lock()
            .unwrap()
            .get(index)
            .cloned()
            .ok_or_else(|| SearchIndexError::index_not_found(index))
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.calls.lock().unwrap().push(IndexCall::Delete(index.to_string()));
        self.journal.record(format!("delete {index}"));

        if self.failing_deletes.contains(index) {
            return Err(SearchIndexError::delete("cluster_block_exception"));
        }
        self.definitions.lock().unwrap().remove(index);
        Ok(())
    }

    async fn create_index(
        &self,
        index: &str,
        aliases: &Value,
        mappings: &Value,
        settings: &Value,
    ) -> Result<(), SearchIndexError> {
        self.calls.lock().unwrap().push(IndexCall::Create {
            index: index.to_string(),
            aliases: aliases.clone(),
            mappings: mappings.clone(),
            settings: settings.clone(),
        });
        self.journal.record(format!("create {index}"));

        self.definitions.lock().unwrap().insert(
            index.to_string(),
            IndexDefinition {
                aliases: aliases.clone(),
                mappings: mappings.clone(),
                settings: settings.clone(),
            },
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(true)
    }
}

/// Row source returning fixed rows or a fixed error.
pub struct MockRowSource {
    result: Result<Vec<SourceRow>, SourceError>,
    closed: AtomicBool,
    journal: Journal,
}

impl MockRowSource {
    pub fn with_rows(rows: Vec<SourceRow>) -> Self {
        Self {
            result: Ok(rows),
            closed: AtomicBool::new(false),
            journal: Journal::new(),
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            result: Err(error),
            closed: AtomicBool::new(false),
            journal: Journal::new(),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RowSource for MockRowSource {
    async fn select_all(&self, table: &str) -> Result<Vec<SourceRow>, SourceError> {
        self.journal.record(format!("select {table}"));
        self.result.clone()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Sender recording acknowledged messages, optionally failing one attempt.
pub struct MockSender {
    destination: String,
    fail_at: Option<usize>,
    fail_close: bool,
    attempts: AtomicUsize,
    sent: Mutex<Vec<OutboundMessage>>,
    closed: AtomicBool,
}

impl MockSender {
    pub fn new(destination: &str) -> Self {
        Self {
            destination: destination.to_string(),
            fail_at: None,
            fail_close: false,
            attempts: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Fail the `attempt`-th send (1-based).
    pub fn failing_at(mut self, attempt: usize) -> Self {
        self.fail_at = Some(attempt);
        self
    }

    /// Fail `close` after marking the sender closed.
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSender for MockSender {
    fn destination(&self) -> &str {
        &self.destination
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), SinkError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(attempt) {
            return Err(SinkError::delivery("Message timed out"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(SinkError::close(format!("{} flush timed out", self.destination)));
        }
        Ok(())
    }
}
