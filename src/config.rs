//! Runtime configuration for tiered-kv.
//!
//! Configuration can be loaded from a JSON file or constructed
//! programmatically. All tier knobs (capacities, demote watermark) and the
//! payload limits live here.

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::cache::CacheError;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "tiered-kv", about = "Multi-tier KV cache server")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address (overrides the config file).
    #[arg(long)]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Tier capacities and thresholds.
    pub tiers: TierConfig,

    /// Payload admission limits.
    pub limits: LimitsConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080").
    pub listen: String,

    /// Maximum concurrent in-flight requests.
    pub max_concurrent_requests: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            max_concurrent_requests: 64,
        }
    }
}

/// Tier capacities and the demotion threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Maximum entries in the hot tier.
    pub hot_capacity: usize,

    /// Maximum entries in the warm tier.
    pub warm_capacity: usize,

    /// Demote one entry when a tier's size strictly exceeds this fraction of
    /// its capacity.
    pub demote_watermark: f64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            hot_capacity: 100,
            warm_capacity: 500,
            demote_watermark: 0.8,
        }
    }
}

/// Admission limits for keys and values. Oversized payloads are rejected,
/// never truncated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum key length in bytes.
    pub max_key_bytes: usize,

    /// Maximum value length in bytes.
    pub max_value_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_key_bytes: 256,
            max_value_bytes: 4 * 1024 * 1024, // 4 MiB
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for
    /// missing fields (or a missing file).
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Fail fast on values the cache cannot run with.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.tiers.hot_capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "tiers.hot_capacity must be greater than zero".to_string(),
            ));
        }
        if self.tiers.warm_capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "tiers.warm_capacity must be greater than zero".to_string(),
            ));
        }
        if !(self.tiers.demote_watermark > 0.0 && self.tiers.demote_watermark <= 1.0) {
            return Err(CacheError::InvalidConfiguration(format!(
                "tiers.demote_watermark must be in (0, 1], got {}",
                self.tiers.demote_watermark
            )));
        }
        if self.limits.max_key_bytes == 0 || self.limits.max_value_bytes == 0 {
            return Err(CacheError::InvalidConfiguration(
                "limits.max_key_bytes and limits.max_value_bytes must be greater than zero"
                    .to_string(),
            ));
        }
        if self.server.max_concurrent_requests == 0 {
            return Err(CacheError::InvalidConfiguration(
                "server.max_concurrent_requests must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
