//! Search sources and response models

use crate::config::{CollectionConfig, CollectionsSettings};
use crate::results::{EntityKind, ResultContainer, SearchResultItem};
use serde::{Deserialize, Serialize};

/// Collection and field searched for one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySource {
    pub kind: EntityKind,
    pub collection: String,
    pub field: String,
}

impl EntitySource {
    pub fn new(kind: EntityKind, collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind,
            collection: collection.into(),
            field: field.into(),
        }
    }

    fn from_config(kind: EntityKind, config: &CollectionConfig) -> Self {
        Self::new(kind, config.name.clone(), config.field.clone())
    }

    /// Sources for every kind, in merge order
    pub fn from_settings(collections: &CollectionsSettings) -> Vec<Self> {
        vec![
            Self::from_config(EntityKind::User, &collections.users),
            Self::from_config(EntityKind::Channel, &collections.channels),
        ]
    }
}

/// Body of a successful search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    /// Kinds whose lookup failed under the best-effort policy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<EntityKind>,
}

impl SearchResponse {
    /// `{ "results": [] }`
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.results.iter().filter(|item| item.kind == kind).count()
    }
}

impl From<ResultContainer> for SearchResponse {
    fn from(container: ResultContainer) -> Self {
        let unavailable = container.get_unavailable();
        Self {
            results: container.into_ordered_results(),
            unavailable,
        }
    }
}
