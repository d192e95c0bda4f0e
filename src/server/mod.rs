//! HTTP front end for the tiered cache.
//!
//! - [`api`]: Request/response types and route handlers

pub mod api;
