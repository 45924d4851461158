//! TOML configuration for the `ringlet` CLI.
//!
//! Every section is optional. Without a config file the ring uses murmur3,
//! 100 replicas per node and starts with no nodes.

use std::path::Path;

use anyhow::Context;
use ringlet_hash::HashAlgorithm;
use ringlet_ring::{ConsistentHashRing, DEFAULT_REPLICAS};
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ring shape and initial membership.
    pub ring: RingSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[ring]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RingSection {
    /// Hash algorithm: `"md5"`, `"sha256"`, `"murmur3"` or `"blake3"`.
    pub hash: Option<HashAlgorithm>,
    /// Virtual replicas per node.
    pub replicas: Option<u32>,
    /// Nodes placed on the ring at startup.
    pub nodes: Vec<String>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("cannot read {}", p.display()))?;
                let config: CliConfig = toml::from_str(&content)
                    .with_context(|| format!("invalid config in {}", p.display()))?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective hash algorithm (defaults to murmur3).
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.ring.hash.unwrap_or_default()
    }

    /// Effective replica count.
    pub fn replicas(&self) -> u32 {
        self.ring.replicas.unwrap_or(DEFAULT_REPLICAS)
    }

    /// Build a ring from this config, with every configured node added.
    pub fn build_ring(&self) -> anyhow::Result<ConsistentHashRing> {
        let mut ring = ConsistentHashRing::new(self.hash_algorithm().build(), self.replicas())
            .context("invalid [ring] replicas")?;
        for node in &self.ring.nodes {
            ring.add_node(node);
        }
        Ok(ring)
    }
}
