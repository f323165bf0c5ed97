//! mention-search: prefix lookup of users and channels for mention autocomplete
//!
//! A raw query is normalized, turned into one bounded prefix-range lookup per
//! entity collection, and the shaped records are merged into a single list.

pub mod config;
pub mod metrics;
pub mod query;
pub mod results;
pub mod search;
pub mod store;
pub mod web;

pub use config::Settings;
pub use results::{EntityKind, SearchResultItem};
pub use search::{SearchAggregator, SearchError, SearchResponse};
pub use store::{Document, DocumentStore, RangeQuery, StoreError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Queries shorter than this (in characters) are not searched
pub const MIN_QUERY_LENGTH: usize = 2;

/// Maximum number of results returned per entity kind
pub const RESULTS_PER_KIND: usize = 5;

/// Default bound on a whole aggregate search in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;
