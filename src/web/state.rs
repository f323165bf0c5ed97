//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::search::SearchAggregator;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search aggregator
    pub search: Arc<SearchAggregator>,
}

impl AppState {
    /// Create new application state around an injected store
    pub fn new(settings: Settings, store: Arc<dyn DocumentStore>) -> Self {
        let search = SearchAggregator::from_settings(store, &settings.search, &settings.collections);

        Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        self.search.metrics()
    }
}
