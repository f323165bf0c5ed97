//! Search errors

use crate::query::InvalidTypeFilter;
use crate::results::EntityKind;
use crate::store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Failure of an aggregate search
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The `type` filter named no known kind
    #[error(transparent)]
    InvalidTypeFilter(#[from] InvalidTypeFilter),
    /// A per-kind store lookup failed
    #[error("{kind} lookup failed: {source}")]
    Lookup {
        kind: EntityKind,
        #[source]
        source: StoreError,
    },
    /// The whole search ran past its deadline
    #[error("search timed out after {0:?}")]
    Timeout(Duration),
}

impl SearchError {
    /// Whether the caller supplied bad input, as opposed to a store failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::InvalidTypeFilter(_))
    }
}
