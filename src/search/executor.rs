//! Search execution and orchestration

use super::error::SearchError;
use super::models::{EntitySource, SearchResponse};
use crate::config::{CollectionsSettings, FailurePolicy, SearchSettings};
use crate::metrics::Metrics;
use crate::query::{NormalizedQuery, TypeFilter};
use crate::results::{shape, ResultContainer, SearchResultItem};
use crate::store::DocumentStore;
use futures::future::{join_all, try_join_all};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Fans a query out to one prefix lookup per entity kind and merges the results
pub struct SearchAggregator {
    /// Store queried for every kind
    store: Arc<dyn DocumentStore>,
    /// Searchable kinds, in merge order
    sources: Vec<EntitySource>,
    /// Shorter queries are not searched
    min_query_length: usize,
    /// Store-level cap per kind
    limit_per_kind: usize,
    /// Bound on the whole aggregate call
    timeout: Duration,
    /// Handling of a failed lookup
    policy: FailurePolicy,
    metrics: Arc<Metrics>,
}

impl SearchAggregator {
    /// Create an aggregator with default collections and limits
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::from_settings(
            store,
            &SearchSettings::default(),
            &CollectionsSettings::default(),
        )
    }

    pub fn from_settings(
        store: Arc<dyn DocumentStore>,
        search: &SearchSettings,
        collections: &CollectionsSettings,
    ) -> Self {
        Self {
            store,
            sources: EntitySource::from_settings(collections),
            min_query_length: search.min_query_length,
            limit_per_kind: search.limit_per_kind,
            timeout: Duration::from_millis(search.timeout_ms),
            policy: search.failure_policy,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Set the overall timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the failure policy
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Search from raw request input
    ///
    /// A missing or too-short query yields an empty response without any store
    /// call, whatever the filter. The filter is only validated when a search
    /// would actually run.
    pub async fn search(
        &self,
        query: Option<&str>,
        type_filter: Option<&str>,
    ) -> Result<SearchResponse, SearchError> {
        self.metrics.inc_search();

        let Some(key) = NormalizedQuery::parse(query, self.min_query_length) else {
            self.metrics.inc_short_circuit();
            return Ok(SearchResponse::empty());
        };

        let filter = TypeFilter::parse(type_filter)?;
        self.execute(&key, filter).await
    }

    /// Run the lookups for a normalized key under the overall timeout
    pub async fn execute(
        &self,
        key: &NormalizedQuery,
        filter: TypeFilter,
    ) -> Result<SearchResponse, SearchError> {
        let sources: Vec<&EntitySource> = self
            .sources
            .iter()
            .filter(|source| filter.includes(source.kind))
            .collect();

        info!(
            "Executing search '{}' ({}) on {} collections",
            key,
            filter,
            sources.len()
        );

        let container = match timeout(self.timeout, self.run(&sources, key)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Search '{}' timed out after {:?}", key, self.timeout);
                return Err(SearchError::Timeout(self.timeout));
            }
        };

        Ok(container.into())
    }

    async fn run(
        &self,
        sources: &[&EntitySource],
        key: &NormalizedQuery,
    ) -> Result<ResultContainer, SearchError> {
        let mut container = ResultContainer::new();
        let lookups = sources.iter().map(|source| self.lookup(source, key));

        match self.policy {
            FailurePolicy::FailFast => {
                // The first failure drops the remaining lookups
                let items = try_join_all(lookups).await?;
                for (source, items) in sources.iter().zip(items) {
                    container.add_results(source.kind, items);
                }
            }
            FailurePolicy::BestEffort => {
                let outcomes = join_all(lookups).await;
                let mut first_error = None;

                for (source, outcome) in sources.iter().zip(outcomes) {
                    match outcome {
                        Ok(items) => container.add_results(source.kind, items),
                        Err(e) => {
                            warn!("Dropping {} results: {}", source.kind, e);
                            container.add_unavailable(source.kind);
                            first_error.get_or_insert(e);
                        }
                    }
                }

                if let Some(e) = first_error {
                    if container.get_unavailable().len() == sources.len() {
                        return Err(e);
                    }
                }
            }
        }

        Ok(container)
    }

    /// Prefix lookup for one kind, shaped into result items
    async fn lookup(
        &self,
        source: &EntitySource,
        key: &NormalizedQuery,
    ) -> Result<Vec<SearchResultItem>, SearchError> {
        let query = key
            .prefix_range()
            .to_query(&source.collection, &source.field, self.limit_per_kind);
        let start = Instant::now();

        debug!(
            "Querying {} on {}.{}",
            self.store.name(),
            source.collection,
            source.field
        );

        match self.store.range_query(&query).await {
            Ok(documents) => {
                let elapsed = start.elapsed();
                let items: Vec<SearchResultItem> = documents
                    .iter()
                    .take(self.limit_per_kind)
                    .map(|doc| shape(source.kind, doc))
                    .collect();

                self.metrics
                    .record_success(source.kind, items.len(), elapsed.as_millis() as u64);
                debug!(
                    "Lookup {} returned {} results in {:?}",
                    source.kind,
                    items.len(),
                    elapsed
                );
                Ok(items)
            }
            Err(e) => {
                self.metrics.record_error(source.kind);
                Err(SearchError::Lookup {
                    kind: source.kind,
                    source: e,
                })
            }
        }
    }
}
