//! Tier manager: orchestrates the three tiers behind `get`/`put`.
//!
//! The manager owns the hot, warm, and cold stores, the pressure policy, and
//! the migration engine. Per key the reachable states are {absent, hot,
//! warm, cold}:
//! - `put` writes to hot, then evaluates the policy (which may cascade
//!   hot→warm and warm→cold demotions)
//! - `get` probes hot, then warm, then cold; a hit in a lower tier promotes
//!   the entry one tier up before returning
//! - absent is reachable only through eviction from a full bounded tier
//!
//! A key never occupies two tiers: transfers are atomic moves through the
//! migration engine.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::migration::MigrationEngine;
use crate::cache::policy::PressurePolicy;
use crate::cache::store::{TierName, TierStore};
use crate::cache::{CacheError, TierEvent};
use crate::config::TierConfig;

/// Per-tier usage statistics.
#[derive(Debug, Clone, Serialize)]
pub struct TierStats {
    pub name: TierName,
    pub entry_count: usize,
    /// None for the unbounded cold tier.
    pub capacity: Option<usize>,
    /// Entry count as a fraction of capacity (0.0 for unbounded tiers).
    pub utilization: f64,
}

impl TierStats {
    fn of<V>(store: &TierStore<V>) -> Self {
        let utilization = match store.capacity() {
            Some(capacity) if capacity > 0 => store.len() as f64 / capacity as f64,
            _ => 0.0,
        };
        Self {
            name: store.name(),
            entry_count: store.len(),
            capacity: store.capacity(),
            utilization,
        }
    }
}

/// Counters for tier transitions since startup.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MigrationStats {
    pub promotions: u64,
    pub demotions: u64,
    pub evictions: u64,
}

/// The central coordinator. Created once, explicitly owned by the caller;
/// there is no hidden global instance.
pub struct TierManager<V> {
    hot: TierStore<V>,
    warm: TierStore<V>,
    cold: TierStore<V>,
    policy: PressurePolicy,
    migration: MigrationEngine,
    stats: MigrationStats,
}

impl<V: Clone> TierManager<V> {
    /// Build a manager from tier configuration. Fails fast on zero
    /// capacities or an out-of-range watermark.
    pub fn new(config: &TierConfig) -> Result<Self, CacheError> {
        Ok(Self {
            hot: TierStore::bounded(TierName::Hot, config.hot_capacity)?,
            warm: TierStore::bounded(TierName::Warm, config.warm_capacity)?,
            cold: TierStore::unbounded(TierName::Cold),
            policy: PressurePolicy::new(config.demote_watermark)?,
            migration: MigrationEngine::new(),
            stats: MigrationStats::default(),
        })
    }

    /// Look up `key`, probing hot → warm → cold. The first hit wins; a hit
    /// in warm or cold promotes the entry one tier up before returning. A
    /// total miss is `None`, never an error.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if let Some(value) = self.hot.get(key) {
            return Some(value.clone());
        }

        if self.warm.contains(key) {
            let transfer = self.migration.promote(key, &mut self.warm, &mut self.hot)?;
            self.record(TierEvent::Promotion {
                key: key.to_string(),
                from: TierName::Warm,
                to: TierName::Hot,
            });
            if let Some(evicted) = transfer.evicted {
                self.record(TierEvent::Eviction {
                    key: evicted.key,
                    tier: TierName::Hot,
                });
            }
            return Some(transfer.value);
        }

        if self.cold.contains(key) {
            let transfer = self.migration.promote(key, &mut self.cold, &mut self.warm)?;
            self.record(TierEvent::Promotion {
                key: key.to_string(),
                from: TierName::Cold,
                to: TierName::Warm,
            });
            if let Some(evicted) = transfer.evicted {
                self.record(TierEvent::Eviction {
                    key: evicted.key,
                    tier: TierName::Warm,
                });
            }
            return Some(transfer.value);
        }

        None
    }

    /// Insert or overwrite `key`. Always writes to hot, then evaluates the
    /// pressure policy, which may cascade up to one demotion per bounded
    /// tier. Never fails: capacity is satisfied by eviction.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        if let Some(evicted) = self.hot.put(key, value) {
            self.record(TierEvent::Eviction {
                key: evicted.key,
                tier: TierName::Hot,
            });
        }

        let events = self.policy.evaluate(
            &mut self.hot,
            &mut self.warm,
            &mut self.cold,
            &self.migration,
        );
        for event in events {
            self.record(event);
        }
    }

    /// Which tier currently holds `key`, if any. No side effects.
    pub fn locate(&self, key: &str) -> Option<TierName> {
        if self.hot.contains(key) {
            Some(TierName::Hot)
        } else if self.warm.contains(key) {
            Some(TierName::Warm)
        } else if self.cold.contains(key) {
            Some(TierName::Cold)
        } else {
            None
        }
    }

    /// Borrow one of the tier stores.
    pub fn store(&self, name: TierName) -> &TierStore<V> {
        match name {
            TierName::Hot => &self.hot,
            TierName::Warm => &self.warm,
            TierName::Cold => &self.cold,
        }
    }

    /// Usage statistics for all tiers, hot first.
    pub fn tier_stats(&self) -> [TierStats; 3] {
        [
            TierStats::of(&self.hot),
            TierStats::of(&self.warm),
            TierStats::of(&self.cold),
        ]
    }

    /// Transition counters since startup.
    pub fn migration_stats(&self) -> MigrationStats {
        self.stats
    }

    /// Total entries across all tiers.
    pub fn total_entries(&self) -> usize {
        self.hot.len() + self.warm.len() + self.cold.len()
    }

    fn record(&mut self, event: TierEvent) {
        match &event {
            TierEvent::Promotion { .. } => self.stats.promotions += 1,
            TierEvent::Demotion { .. } => self.stats.demotions += 1,
            // Transfers log inside the migration engine; evictions are
            // terminal, so they are logged here.
            TierEvent::Eviction { key, tier } => {
                self.stats.evictions += 1;
                debug!(key, tier = %tier, "Evicted entry");
            }
        }
    }
}

/// Thread-safe handle to the manager. `get` promotes, so both operations
/// take the write guard; put and its policy evaluation share one critical
/// section.
pub type SharedTierManager<V> = Arc<RwLock<TierManager<V>>>;

/// Create a new thread-safe tier manager.
pub fn new_shared_manager<V: Clone>(
    config: &TierConfig,
) -> Result<SharedTierManager<V>, CacheError> {
    Ok(Arc::new(RwLock::new(TierManager::new(config)?)))
}
