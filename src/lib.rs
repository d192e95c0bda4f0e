//! tiered-kv: multi-tier key/value cache.
//!
//! Entries live in one of three tiers ordered by access speed:
//!   hot (bounded) → warm (bounded) → cold (unbounded)
//!
//! Writes land in hot and may cascade demotions when a tier goes over its
//! pressure watermark; reads probe hot→warm→cold and promote lower-tier hits
//! one tier up. The core is transport-agnostic; a thin axum front end
//! exposes put/get over HTTP.

pub mod cache;
pub mod config;
pub mod server;
