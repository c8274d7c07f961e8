use super::clock::Clock;
use crate::composer::CustomerSummary;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

/// A stored summary and the time it was computed.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub summary: Arc<CustomerSummary>,
}

impl CacheEntry {
    /// True iff `now - timestamp <= ttl`. An entry stamped in the future
    /// (clock moved backwards) counts as fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.timestamp).to_std() {
            Ok(age) => age <= ttl,
            Err(_) => true,
        }
    }
}

/// In-memory per-customer summary cache.
///
/// Entries are only ever replaced whole, under the write lock, so readers
/// see either the previous or the new summary for a customer. Stale entries
/// are never evicted; they are ignored by freshness checks and overwritten
/// by the next completed run.
pub struct SummaryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SummaryCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, customer_id: &str) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(customer_id).cloned()
    }

    /// Store a freshly computed summary stamped with the current time and
    /// return the shared stored value.
    pub fn put(&self, customer_id: &str, summary: CustomerSummary) -> Arc<CustomerSummary> {
        let entry = CacheEntry {
            timestamp: self.clock.now(),
            summary: Arc::new(summary),
        };
        let stored = Arc::clone(&entry.summary);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(customer_id.to_string(), entry);
        debug!(customer_id, size = entries.len(), "Cached summary");
        stored
    }

    pub fn is_fresh(&self, customer_id: &str, ttl: Duration) -> bool {
        let now = self.clock.now();
        self.get(customer_id)
            .is_some_and(|entry| entry.is_fresh_at(now, ttl))
    }

    /// The cached summary for `customer_id` if it is within the configured TTL.
    pub fn fresh(&self, customer_id: &str) -> Option<Arc<CustomerSummary>> {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(customer_id)
            .filter(|entry| entry.is_fresh_at(now, self.ttl))
            .map(|entry| Arc::clone(&entry.summary))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
