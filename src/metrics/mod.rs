//! Metrics collection module
//!
//! Tracks lookups, failures and latencies per entity kind.

use crate::results::EntityKind;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of response times kept per kind
const RESPONSE_TIME_WINDOW: usize = 100;

/// Search metrics shared by all requests
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    /// Searches answered without touching the store
    short_circuited: AtomicU64,
    /// Per-kind counters and latencies
    kinds: RwLock<HashMap<EntityKind, KindCounters>>,
}

#[derive(Debug, Default)]
struct KindCounters {
    lookups: u64,
    failures: u64,
    items: u64,
    response_times: VecDeque<u64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            short_circuited: AtomicU64::new(0),
            kinds: RwLock::new(HashMap::new()),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a search dropped for a short or missing query
    pub fn inc_short_circuit(&self) {
        self.short_circuited.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful lookup
    pub fn record_success(&self, kind: EntityKind, items: usize, time_ms: u64) {
        self.with_kind(kind, |counters| {
            counters.lookups += 1;
            counters.items += items as u64;
            if counters.response_times.len() >= RESPONSE_TIME_WINDOW {
                counters.response_times.pop_front();
            }
            counters.response_times.push_back(time_ms);
        });
    }

    /// Record a failed lookup
    pub fn record_error(&self, kind: EntityKind) {
        self.with_kind(kind, |counters| {
            counters.lookups += 1;
            counters.failures += 1;
        });
    }

    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    pub fn get_short_circuited(&self) -> u64 {
        self.short_circuited.load(Ordering::Relaxed)
    }

    /// Get average response time for a kind
    pub fn get_avg_response_time(&self, kind: EntityKind) -> Option<u64> {
        let kinds = self.kinds.read().unwrap_or_else(PoisonError::into_inner);
        kinds.get(&kind).and_then(|c| Self::average(&c.response_times))
    }

    /// Get reliability percentage for a kind
    pub fn get_reliability(&self, kind: EntityKind) -> f64 {
        let kinds = self.kinds.read().unwrap_or_else(PoisonError::into_inner);
        kinds.get(&kind).map(Self::reliability).unwrap_or(100.0)
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let kinds = self.kinds.read().unwrap_or_else(PoisonError::into_inner);

        MetricsSnapshot {
            total_searches: self.get_total_searches(),
            short_circuited: self.get_short_circuited(),
            kinds: kinds
                .iter()
                .map(|(kind, c)| {
                    (
                        *kind,
                        KindStats {
                            lookups: c.lookups,
                            failures: c.failures,
                            items: c.items,
                            avg_response_time_ms: Self::average(&c.response_times),
                            reliability: Self::reliability(c),
                        },
                    )
                })
                .collect(),
        }
    }

    fn with_kind(&self, kind: EntityKind, update: impl FnOnce(&mut KindCounters)) {
        let mut kinds = self.kinds.write().unwrap_or_else(PoisonError::into_inner);
        update(kinds.entry(kind).or_default());
    }

    fn average(times: &VecDeque<u64>) -> Option<u64> {
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    fn reliability(counters: &KindCounters) -> f64 {
        if counters.lookups == 0 {
            100.0
        } else {
            let successes = counters.lookups - counters.failures;
            (successes as f64 / counters.lookups as f64) * 100.0
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable metrics for the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub short_circuited: u64,
    pub kinds: BTreeMap<EntityKind, KindStats>,
}

/// Statistics for a single entity kind
#[derive(Debug, Clone, Serialize)]
pub struct KindStats {
    pub lookups: u64,
    pub failures: u64,
    pub items: u64,
    pub avg_response_time_ms: Option<u64>,
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.inc_search();
        metrics.inc_short_circuit();
        metrics.record_success(EntityKind::User, 3, 100);
        metrics.record_success(EntityKind::User, 1, 50);
        metrics.record_error(EntityKind::Channel);

        assert_eq!(metrics.get_total_searches(), 2);
        assert_eq!(metrics.get_short_circuited(), 1);
        assert_eq!(metrics.get_avg_response_time(EntityKind::User), Some(75));
        assert_eq!(metrics.get_avg_response_time(EntityKind::Channel), None);
        assert_eq!(metrics.get_reliability(EntityKind::User), 100.0);
        assert_eq!(metrics.get_reliability(EntityKind::Channel), 0.0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.kinds[&EntityKind::User].items, 4);
        assert_eq!(snapshot.kinds[&EntityKind::Channel].failures, 1);
    }

    #[test]
    fn test_response_time_window() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_success(EntityKind::User, 0, 10);
        }
        metrics.record_success(EntityKind::User, 0, 1010);

        // One 10ms sample was evicted for the slow one
        assert_eq!(metrics.get_avg_response_time(EntityKind::User), Some(20));
    }
}
