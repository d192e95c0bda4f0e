//! Migration engine: moves entries between two tiers.
//!
//! A transfer is a single atomic move (remove from the source, insert into
//! the destination), so a key never lives in two tiers at once. Destination
//! capacity is enforced inside [`TierStore::put`], which may evict its
//! oldest entry to make room; that casualty is reported back through
//! [`Transfer::evicted`].

use tracing::debug;

use crate::cache::store::{Evicted, TierStore};

/// Outcome of a completed transfer.
#[derive(Debug)]
pub struct Transfer<V> {
    /// The value that moved tiers.
    pub value: V,
    /// Entry the destination evicted to make room, if it was full.
    pub evicted: Option<Evicted<V>>,
}

/// Performs directional transfers between tiers. Holds no state of its own;
/// the stores involved are borrowed per call.
#[derive(Debug, Default)]
pub struct MigrationEngine;

impl MigrationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Move `key` one tier up on the read path (warm→hot or cold→warm).
    ///
    /// Returns None without touching either store when the key is absent
    /// from the source.
    pub fn promote<V: Clone>(
        &self,
        key: &str,
        from: &mut TierStore<V>,
        to: &mut TierStore<V>,
    ) -> Option<Transfer<V>> {
        let transfer = self.move_entry(key, from, to)?;
        debug!(key, from = %from.name(), to = %to.name(), "Promoted entry");
        Some(transfer)
    }

    /// Move `key` one tier down on the write path (hot→warm or warm→cold).
    pub fn demote<V: Clone>(
        &self,
        key: &str,
        from: &mut TierStore<V>,
        to: &mut TierStore<V>,
    ) -> Option<Transfer<V>> {
        let transfer = self.move_entry(key, from, to)?;
        debug!(key, from = %from.name(), to = %to.name(), "Demoted entry");
        Some(transfer)
    }

    fn move_entry<V: Clone>(
        &self,
        key: &str,
        from: &mut TierStore<V>,
        to: &mut TierStore<V>,
    ) -> Option<Transfer<V>> {
        let value = from.remove(key)?;
        let evicted = to.put(key, value.clone());
        Some(Transfer { value, evicted })
    }
}
