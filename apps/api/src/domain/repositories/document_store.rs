use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by document store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} document not found: {id}")]
    NotFound { collection: String, id: Uuid },

    #[error("{collection} document already exists: {id}")]
    Duplicate { collection: String, id: Uuid },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Containment filter over a document's JSON body
///
/// Matches with the same semantics as PostgreSQL's `jsonb @>` operator:
/// object keys must all be present and contained, every element of a
/// filter array must be contained in some element of the document array,
/// and scalars compare by equality.
///
/// # Example
/// ```
/// use hackathon_api::domain::repositories::Filter;
/// use serde_json::json;
///
/// let filter = Filter::new().eq("status", "open");
/// assert!(filter.matches(&json!({"status": "open", "name": "Hack"})));
/// assert!(!filter.matches(&json!({"status": "draft"})));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `field` to equal `value`
    pub fn eq(mut self, field: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.0.insert(field.to_string(), value);
        self
    }

    /// Requires the array at `field` to contain `value`
    pub fn contains(mut self, field: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.0.insert(field.to_string(), Value::Array(vec![value]));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn matches(&self, document: &Value) -> bool {
        json_contains(document, &self.as_value())
    }
}

/// jsonb `@>` containment
pub fn json_contains(document: &Value, pattern: &Value) -> bool {
    match (document, pattern) {
        (Value::Object(doc), Value::Object(pat)) => pat
            .iter()
            .all(|(key, p)| doc.get(key).is_some_and(|d| json_contains(d, p))),
        (Value::Array(doc), Value::Array(pat)) => pat
            .iter()
            .all(|p| doc.iter().any(|d| json_contains(d, p))),
        (Value::Array(doc), scalar) if !scalar.is_object() => {
            doc.iter().any(|d| d == scalar)
        }
        (doc, pat) => doc == pat,
    }
}

/// Storage contract for JSON documents grouped in named collections
///
/// Implementations must keep insertion order stable for `find`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document; fails with `Duplicate` if the id exists
    async fn insert(&self, collection: &str, id: Uuid, body: Value) -> StoreResult<()>;

    /// Insert or replace a document
    async fn upsert(&self, collection: &str, id: Uuid, body: Value) -> StoreResult<()>;

    /// Fetch a document by id
    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Value>>;

    /// Fetch all documents matching the filter, oldest first
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>>;

    /// Count documents matching the filter
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Delete a document; returns whether it existed
    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool>;

    /// Delete all documents matching the filter; returns how many were removed
    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;
}
