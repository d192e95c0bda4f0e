//! Tier stores: insertion-ordered KV containers with optional capacity.
//!
//! Each tier is a map from key to opaque value whose iteration order is the
//! insertion order. Overwriting an existing key replaces the value but keeps
//! the key's position. When a new key is inserted at capacity, bounded
//! stores evict exactly one entry, the oldest-inserted, and hand the evicted
//! pair back to the caller. Reads never reorder anything: eviction is FIFO
//! by insertion, not LRU.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::cache::CacheError;

/// Identifies one of the three storage tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierName {
    /// Tier 0: hot (bounded, every write lands here first).
    Hot,
    /// Tier 1: warm (bounded, receives demotions from hot).
    Warm,
    /// Tier 2: cold (unbounded, receives demotions from warm).
    Cold,
}

impl TierName {
    /// Numeric tier level (lower = faster).
    pub fn level(&self) -> u8 {
        match self {
            TierName::Hot => 0,
            TierName::Warm => 1,
            TierName::Cold => 2,
        }
    }

    /// The next slower tier for demotion, or None if already coldest.
    pub fn demote(&self) -> Option<TierName> {
        match self {
            TierName::Hot => Some(TierName::Warm),
            TierName::Warm => Some(TierName::Cold),
            TierName::Cold => None,
        }
    }

    /// The next faster tier for promotion, or None if already hottest.
    pub fn promote(&self) -> Option<TierName> {
        match self {
            TierName::Hot => None,
            TierName::Warm => Some(TierName::Hot),
            TierName::Cold => Some(TierName::Warm),
        }
    }
}

impl std::fmt::Display for TierName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierName::Hot => write!(f, "hot"),
            TierName::Warm => write!(f, "warm"),
            TierName::Cold => write!(f, "cold"),
        }
    }
}

/// An entry pushed out of a bounded store to make room for a new key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evicted<V> {
    pub key: String,
    pub value: V,
}

/// A single tier: an insertion-ordered map with an optional entry-count bound.
///
/// Invariant: `len() <= capacity` holds after every mutating operation on a
/// bounded store. The bound is satisfied by evicting, never by rejecting the
/// write.
#[derive(Debug)]
pub struct TierStore<V> {
    name: TierName,
    capacity: Option<usize>,
    entries: HashMap<String, V>,
    /// Insertion order, front = oldest. Keys here mirror `entries` exactly.
    order: VecDeque<String>,
}

impl<V> TierStore<V> {
    /// Create a bounded store. Zero capacity is a configuration error.
    pub fn bounded(name: TierName, capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfiguration(format!(
                "{name} tier capacity must be greater than zero"
            )));
        }
        Ok(Self {
            name,
            capacity: Some(capacity),
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        })
    }

    /// Create an unbounded store (the cold tier): `put` never evicts.
    pub fn unbounded(name: TierName) -> Self {
        Self {
            name,
            capacity: None,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn name(&self) -> TierName {
        self.name
    }

    /// Entry-count bound, or None for an unbounded store.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Current value for `key`. Does not touch the insertion order.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or overwrite. Inserting a **new** key into a full bounded store
    /// first evicts the oldest-inserted entry and returns it; overwrites and
    /// unbounded stores never evict.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<Evicted<V>> {
        let key = key.into();

        if let Some(slot) = self.entries.get_mut(&key) {
            // Overwrite keeps the key's order position.
            *slot = value;
            return None;
        }

        let mut evicted = None;
        if let Some(capacity) = self.capacity {
            if self.entries.len() == capacity {
                evicted = self.pop_oldest().map(|(key, value)| Evicted { key, value });
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        evicted
    }

    /// Remove `key`, returning its value. Used by migration to give transfers
    /// move semantics.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    /// Remove and return the oldest-inserted entry.
    pub fn pop_oldest(&mut self) -> Option<(String, V)> {
        let key = self.order.pop_front()?;
        let value = self.entries.remove(&key)?;
        Some((key, value))
    }

    /// Remove and return the most-recently-inserted entry.
    pub fn pop_newest(&mut self) -> Option<(String, V)> {
        let key = self.order.pop_back()?;
        let value = self.entries.remove(&key)?;
        Some((key, value))
    }

    /// Key of the oldest-inserted entry (the FIFO eviction candidate).
    pub fn oldest_key(&self) -> Option<&str> {
        self.order.front().map(String::as_str)
    }

    /// Key of the most-recently-inserted entry (the demotion victim).
    pub fn newest_key(&self) -> Option<&str> {
        self.order.back().map(String::as_str)
    }

    /// Keys in insertion order, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
