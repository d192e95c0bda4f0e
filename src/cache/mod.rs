//! Multi-tier cache core.
//!
//! This module contains the tier-management subsystem:
//! - [`store`]: TierStore, the insertion-ordered bounded/unbounded container
//! - [`migration`]: MigrationEngine, atomic moves between two tiers
//! - [`policy`]: PressurePolicy, post-write demotion decisions
//! - [`manager`]: TierManager, the get/put orchestrator owning all three tiers

pub mod manager;
pub mod migration;
pub mod policy;
pub mod store;

use serde::Serialize;
use thiserror::Error;

use crate::cache::store::TierName;

/// Failures the cache can surface. `put`/`get` themselves are total; only
/// construction and payload admission can fail.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("payload too large: {actual} bytes exceeds the {limit}-byte limit for {what}")]
    PayloadTooLarge {
        what: &'static str,
        actual: usize,
        limit: usize,
    },
}

/// A tier transition, emitted by the manager for observability. Carries the
/// key and the tiers involved so a caller can wire these to metrics or
/// tracing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierEvent {
    /// Read hit in a lower tier moved the entry one tier up.
    Promotion {
        key: String,
        from: TierName,
        to: TierName,
    },
    /// Write pressure moved the entry one tier down.
    Demotion {
        key: String,
        from: TierName,
        to: TierName,
    },
    /// A full bounded tier dropped its oldest entry to admit a new key.
    Eviction { key: String, tier: TierName },
}
