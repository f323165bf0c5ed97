//! Store traits and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A document read from a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier, unique within its collection
    pub id: String,
    /// Document fields as decoded JSON values
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create an empty document
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Set a field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field if it holds a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// `field >= start AND field <= end`, ascending by field, at most `limit` documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeQuery {
    /// Collection to query
    pub collection: String,
    /// Indexed string field the bounds apply to
    pub field: String,
    /// Inclusive lower bound
    pub start: String,
    /// Inclusive upper bound
    pub end: String,
    /// Maximum number of documents to return
    pub limit: usize,
}

impl RangeQuery {
    pub fn new(
        collection: impl Into<String>,
        field: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            collection: collection.into(),
            field: field.into(),
            start: start.into(),
            end: end.into(),
            limit,
        }
    }

    /// Check whether a field value falls inside the bounds
    pub fn matches(&self, value: &str) -> bool {
        value >= self.start.as_str() && value <= self.end.as_str()
    }
}

/// Failure reported by a store backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Store unreachable, timed out or answered with a server error
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Credentials missing or rejected
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Query rejected by the store, e.g. a missing index
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// Store answered with something that could not be decoded
    #[error("malformed store response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Malformed(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

/// A document collection store supporting bounded range queries
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Run a range query against one collection
    async fn range_query(&self, query: &RangeQuery) -> Result<Vec<Document>, StoreError>;
}
