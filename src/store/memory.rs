//! In-memory document store
//!
//! Keeps collections in process, ordered the way the hosted store orders
//! string fields (UTF-8 byte order). Used as the default backend for local
//! runs and as the fake in tests.

use super::traits::{Document, DocumentStore, RangeQuery, StoreError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Collections held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to a collection
    pub fn insert(&mut self, collection: impl Into<String>, document: Document) {
        self.collections
            .entry(collection.into())
            .or_default()
            .push(document);
    }

    /// Builder form of [`MemoryStore::insert`]
    pub fn with_document(mut self, collection: impl Into<String>, document: Document) -> Self {
        self.insert(collection, document);
        self
    }

    /// Load collections from a YAML or JSON seed file
    ///
    /// The file maps collection names to lists of objects. An `id` key is used
    /// as the document identifier; objects without one get a generated id.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let store = Self::from_seed_str(&content)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;
        info!(
            "Seeded memory store with {} documents from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parse seed content (YAML, which also accepts JSON)
    pub fn from_seed_str(content: &str) -> Result<Self> {
        let seed: HashMap<String, Vec<Map<String, Value>>> = serde_yaml::from_str(content)?;
        let mut store = Self::new();

        for (collection, entries) in seed {
            for mut fields in entries {
                let id = match fields.remove("id") {
                    Some(Value::String(id)) => id,
                    Some(other) => other.to_string(),
                    None => uuid::Uuid::new_v4().to_string(),
                };
                store.insert(collection.clone(), Document { id, fields });
            }
        }

        Ok(store)
    }

    /// Total number of documents across collections
    pub fn len(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    /// Check if the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn range_query(&self, query: &RangeQuery) -> Result<Vec<Document>, StoreError> {
        let Some(documents) = self.collections.get(&query.collection) else {
            debug!("Collection {} is empty", query.collection);
            return Ok(vec![]);
        };

        let mut matched: Vec<(&str, &Document)> = documents
            .iter()
            .filter_map(|doc| {
                doc.get_str(&query.field)
                    .filter(|value| query.matches(value))
                    .map(|value| (value, doc))
            })
            .collect();

        matched.sort_by(|(a, da), (b, db)| a.cmp(b).then_with(|| da.id.cmp(&db.id)));

        Ok(matched
            .into_iter()
            .take(query.limit)
            .map(|(_, doc)| doc.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_document("users", Document::new("u3").field("username", "telly"))
            .with_document("users", Document::new("u1").field("username", "telegram_fan"))
            .with_document("users", Document::new("u2").field("username", "tea"))
            .with_document("users", Document::new("u4").field("username", 42))
            .with_document("users", Document::new("u5"))
    }

    fn prefix(key: &str, limit: usize) -> RangeQuery {
        RangeQuery::new("users", "username", key, format!("{key}\u{f8ff}"), limit)
    }

    #[tokio::test]
    async fn test_prefix_range_in_field_order() {
        let docs = store().range_query(&prefix("tel", 5)).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }

    #[tokio::test]
    async fn test_limit_is_applied_after_ordering() {
        let docs = store().range_query(&prefix("te", 1)).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "u2");
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let query = RangeQuery::new("channels", "title", "a", "a\u{f8ff}", 5);
        let docs = store().range_query(&query).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_case_sensitive_match() {
        let store = MemoryStore::new()
            .with_document("channels", Document::new("c1").field("title", "Telegram"));
        let query = RangeQuery::new("channels", "title", "tel", "tel\u{f8ff}", 5);
        assert!(store.range_query(&query).await.unwrap().is_empty());
    }

    #[test]
    fn test_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "users:\n  - id: u1\n    username: telegram_fan\n    firstName: Ana\n  - username: nobody\nchannels:\n  - id: c1\n    title: telegram"
        )
        .unwrap();

        let store = MemoryStore::from_seed_file(file.path()).unwrap();
        assert_eq!(store.len(), 3);

        let users = &store.collections["users"];
        assert_eq!(users[0].id, "u1");
        assert_eq!(users[0].get_str("firstName"), Some("Ana"));
        assert!(!users[0].fields.contains_key("id"));
        assert!(!users[1].id.is_empty());
    }

    #[test]
    fn test_seed_json() {
        let store =
            MemoryStore::from_seed_str(r#"{"channels": [{"id": "c1", "title": "news"}]}"#).unwrap();
        assert_eq!(store.len(), 1);
    }
}
