//! Result container for merging per-kind lookups

use super::types::{EntityKind, SearchResultItem};
use std::collections::{BTreeMap, BTreeSet};

/// Collects shaped items per entity kind and merges them in kind order
///
/// Kind order is users before channels, independent of the order in which
/// lookups complete.
#[derive(Debug, Clone, Default)]
pub struct ResultContainer {
    by_kind: BTreeMap<EntityKind, Vec<SearchResultItem>>,
    unavailable: BTreeSet<EntityKind>,
}

impl ResultContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the items of one kind's lookup
    pub fn add_results(&mut self, kind: EntityKind, items: Vec<SearchResultItem>) {
        self.by_kind.entry(kind).or_default().extend(items);
    }

    /// Record a kind whose lookup failed
    pub fn add_unavailable(&mut self, kind: EntityKind) {
        self.unavailable.insert(kind);
    }

    /// Consume into merged items, users first
    pub fn into_ordered_results(self) -> Vec<SearchResultItem> {
        self.by_kind.into_values().flatten().collect()
    }

    pub fn get_unavailable(&self) -> Vec<EntityKind> {
        self.unavailable.iter().copied().collect()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.by_kind.get(&kind).map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_precede_channels() {
        let mut container = ResultContainer::new();
        container.add_results(
            EntityKind::Channel,
            vec![SearchResultItem::new("c1", EntityKind::Channel, "news")],
        );
        container.add_results(
            EntityKind::User,
            vec![SearchResultItem::new("u1", EntityKind::User, "Ana")],
        );

        assert_eq!(container.count_of(EntityKind::User), 1);
        assert_eq!(container.count_of(EntityKind::Channel), 1);

        let ids: Vec<_> = container
            .into_ordered_results()
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, vec!["u1", "c1"]);
    }

    #[test]
    fn test_unavailable_kinds() {
        let mut container = ResultContainer::new();
        container.add_unavailable(EntityKind::Channel);
        container.add_unavailable(EntityKind::User);
        assert_eq!(
            container.get_unavailable(),
            vec![EntityKind::User, EntityKind::Channel]
        );
        assert!(container.into_ordered_results().is_empty());
    }
}
