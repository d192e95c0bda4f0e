//! Pressure policy: post-write demotion decisions.
//!
//! After every put the policy checks each bounded tier against its demote
//! watermark (strictly greater than `watermark × capacity`) and, if the tier
//! is over pressure, demotes exactly one victim to the next tier down. The
//! warm check always runs after the hot check and sees warm's size with any
//! hot→warm demotion already applied, so a single put can cascade hot→warm
//! and warm→cold in one evaluation. Pressure more than one entry over the
//! watermark drains across subsequent puts, one victim per tier per call.
//!
//! The victim is the most-recently-inserted key of the pressured tier. The
//! stores track no access recency, so this is the only deterministic pick
//! the insertion order offers besides the FIFO head, which is reserved for
//! in-tier eviction.

use crate::cache::migration::MigrationEngine;
use crate::cache::store::TierStore;
use crate::cache::{CacheError, TierEvent};

/// Decides when tiers are over pressure and directs demotions.
#[derive(Debug, Clone)]
pub struct PressurePolicy {
    demote_watermark: f64,
}

impl PressurePolicy {
    /// Create a policy. The watermark is a fraction of capacity in `(0, 1]`.
    pub fn new(demote_watermark: f64) -> Result<Self, CacheError> {
        if !(demote_watermark > 0.0 && demote_watermark <= 1.0) {
            return Err(CacheError::InvalidConfiguration(format!(
                "demote watermark must be in (0, 1], got {demote_watermark}"
            )));
        }
        Ok(Self { demote_watermark })
    }

    pub fn demote_watermark(&self) -> f64 {
        self.demote_watermark
    }

    /// Whether a store is over its demote watermark. Unbounded stores never
    /// are. A store exactly at the watermark is not over it.
    pub fn over_pressure<V>(&self, store: &TierStore<V>) -> bool {
        match store.capacity() {
            Some(capacity) => store.len() as f64 > self.demote_watermark * capacity as f64,
            None => false,
        }
    }

    /// Run one round of pressure relief after a put. Returns the transitions
    /// performed, in order.
    pub fn evaluate<V: Clone>(
        &self,
        hot: &mut TierStore<V>,
        warm: &mut TierStore<V>,
        cold: &mut TierStore<V>,
        migration: &MigrationEngine,
    ) -> Vec<TierEvent> {
        let mut events = Vec::new();

        if self.over_pressure(hot) {
            self.demote_newest(hot, warm, migration, &mut events);
        }

        // Checked regardless of whether hot demoted, against warm's current
        // size.
        if self.over_pressure(warm) {
            self.demote_newest(warm, cold, migration, &mut events);
        }

        events
    }

    fn demote_newest<V: Clone>(
        &self,
        from: &mut TierStore<V>,
        to: &mut TierStore<V>,
        migration: &MigrationEngine,
        events: &mut Vec<TierEvent>,
    ) {
        let Some(victim) = from.newest_key().map(str::to_owned) else {
            return;
        };

        if let Some(transfer) = migration.demote(&victim, from, to) {
            events.push(TierEvent::Demotion {
                key: victim,
                from: from.name(),
                to: to.name(),
            });
            if let Some(evicted) = transfer.evicted {
                events.push(TierEvent::Eviction {
                    key: evicted.key,
                    tier: to.name(),
                });
            }
        }
    }
}
