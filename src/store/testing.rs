//! Store wrappers used by tests to observe and break lookups

use super::traits::{Document, DocumentStore, RangeQuery, StoreError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wraps a store, counting calls and failing or delaying chosen collections
pub struct FlakyStore {
    inner: Arc<dyn DocumentStore>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: impl DocumentStore + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            failing: HashSet::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Make every query on `collection` fail with a connectivity error
    pub fn failing(mut self, collection: &str) -> Self {
        self.failing.insert(collection.to_string());
        self
    }

    /// Sleep before answering each query
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries that ran to the end, successful or not
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn range_query(&self, query: &RangeQuery) -> Result<Vec<Document>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&query.collection) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }

        self.inner.range_query(query).await
    }
}
