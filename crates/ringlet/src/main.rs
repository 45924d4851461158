//! `ringlet` — explore a consistent hash ring from the command line.
//!
//! Builds a ring from a config file and/or flags, then answers questions
//! about it.
//!
//! # Usage
//!
//! ```text
//! ringlet -n ServerA -n ServerB nodes               # list nodes
//! ringlet -c ringlet.toml lookup user:101 user:102  # owner of each key
//! ringlet -c ringlet.toml lookup user:101 --owners 2
//! ringlet --hash md5 -n A -n B -n C distribution    # keys per node
//! ringlet -n A -n B -n C rebalance --add D          # keys remapped by a join
//! ```

mod config;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ringlet_hash::HashAlgorithm;
use ringlet_ring::ConsistentHashRing;
use tracing::{debug, info, warn};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "ringlet",
    version,
    about = "Consistent hash ring explorer"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hash algorithm (md5, sha256, murmur3, blake3). Overrides the config.
    #[arg(long, global = true, env = "RINGLET_HASH")]
    hash: Option<HashAlgorithm>,

    /// Virtual replicas per node. Overrides the config.
    #[arg(short, long, global = true)]
    replicas: Option<u32>,

    /// Node to place on the ring. Can be given multiple times; replaces the
    /// config's node list.
    #[arg(short = 'n', long = "node", global = true)]
    nodes: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the nodes on the ring.
    Nodes,

    /// Show which node owns each key.
    Lookup {
        /// Keys to look up.
        #[arg(required = true)]
        keys: Vec<String>,

        /// Number of distinct owners to list per key (preference list).
        #[arg(long, default_value = "1")]
        owners: usize,
    },

    /// Count how a synthetic key sample spreads across nodes.
    Distribution {
        /// Number of sample keys.
        #[arg(short, long, default_value = "10000")]
        keys: usize,
    },

    /// Measure how many keys move when one node joins or leaves.
    Rebalance {
        /// Node to add.
        #[arg(long, conflicts_with = "remove", required_unless_present = "remove")]
        add: Option<String>,

        /// Node to remove.
        #[arg(long)]
        remove: Option<String>,

        /// Number of sample keys.
        #[arg(short, long, default_value = "10000")]
        keys: usize,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    // CLI args override config file values.
    if let Some(hash) = cli.hash {
        config.ring.hash = Some(hash);
    }
    if let Some(replicas) = cli.replicas {
        config.ring.replicas = Some(replicas);
    }
    if !cli.nodes.is_empty() {
        config.ring.nodes = cli.nodes;
    }

    let ring = config.build_ring()?;
    debug!(
        hash = %config.hash_algorithm(),
        replicas = config.replicas(),
        positions = ring.position_count(),
        "ring built"
    );

    match cli.command {
        Commands::Nodes => cmd_nodes(&ring),
        Commands::Lookup { keys, owners } => cmd_lookup(&ring, &keys, owners),
        Commands::Distribution { keys } => cmd_distribution(&ring, keys),
        Commands::Rebalance { add, remove, keys } => {
            cmd_rebalance(&config, ring, add.as_deref(), remove.as_deref(), keys)
        }
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// `RUST_LOG` takes precedence over the config file.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// -----------------------------------------------------------------------
// Commands
// -----------------------------------------------------------------------

fn cmd_nodes(ring: &ConsistentHashRing) -> Result<()> {
    let nodes = ring.list_nodes();
    println!(
        "Nodes: {} ({} positions, {} replicas/node)",
        nodes.len(),
        ring.position_count(),
        ring.replicas()
    );
    for node in &nodes {
        println!("  {node}");
    }
    Ok(())
}

fn cmd_lookup(ring: &ConsistentHashRing, keys: &[String], owners: usize) -> Result<()> {
    if owners == 0 {
        bail!("--owners must be at least 1");
    }
    if ring.is_empty() {
        warn!("ring has no nodes, every lookup is empty");
    }

    for key in keys {
        let nodes = ring.get_nodes(key, owners);
        if nodes.is_empty() {
            println!("{key} -> <none>");
        } else {
            println!("{key} -> {}", nodes.join(", "));
        }
    }
    Ok(())
}

fn cmd_distribution(ring: &ConsistentHashRing, keys: usize) -> Result<()> {
    if ring.is_empty() {
        bail!("ring has no nodes; pass --node or set [ring] nodes");
    }

    let counts = key_counts(ring, keys);
    println!("Distribution of {keys} keys over {} nodes:", counts.len());
    for (node, count) in &counts {
        println!("  {node:<20} {count:>8} ({:.2}%)", percent(*count, keys));
    }

    if let (Some(min), Some(max)) = (counts.values().min(), counts.values().max()) {
        let ideal = keys as f64 / counts.len() as f64;
        println!();
        println!("  ideal per node: {ideal:.1}");
        println!("  min / max:      {min} / {max}");
    }
    Ok(())
}

fn cmd_rebalance(
    config: &CliConfig,
    before: ConsistentHashRing,
    add: Option<&str>,
    remove: Option<&str>,
    keys: usize,
) -> Result<()> {
    let mut after = config.build_ring()?;
    let change = match (add, remove) {
        (Some(node), None) => {
            if before.contains_node(node) {
                warn!(node, "node is already on the ring");
            }
            after.add_node(node);
            format!("adding {node}")
        }
        (None, Some(node)) => {
            if !before.contains_node(node) {
                warn!(node, "node is not on the ring");
            }
            after.remove_node(node);
            format!("removing {node}")
        }
        _ => bail!("pass exactly one of --add or --remove"),
    };

    let sample = sample_keys(keys);
    let moved = ConsistentHashRing::reassignments(&before, &after, &sample);
    info!(moved = moved.len(), sample = keys, "rebalance computed");

    let expected = match (before.node_count(), after.node_count()) {
        (0, _) | (_, 0) => 1.0,
        (b, a) => 1.0 / b.max(a) as f64,
    };

    println!("Rebalance after {change}:");
    println!(
        "  moved: {} of {keys} keys ({:.2}%, ideal {:.2}%)",
        moved.len(),
        percent(moved.len(), keys),
        expected * 100.0
    );

    let mut flows: BTreeMap<(String, String), usize> = BTreeMap::new();
    for m in moved {
        let from = m.from.unwrap_or_else(|| "<none>".to_string());
        let to = m.to.unwrap_or_else(|| "<none>".to_string());
        *flows.entry((from, to)).or_default() += 1;
    }
    for ((from, to), count) in &flows {
        println!("  {from} -> {to}: {count}");
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

fn sample_keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("key-{i}")).collect()
}

/// Keys owned by each node over a sample of `n` keys. Nodes that own none of
/// the sample are still listed.
fn key_counts(ring: &ConsistentHashRing, n: usize) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> =
        ring.list_nodes().into_iter().map(|node| (node, 0)).collect();
    for key in sample_keys(n) {
        if let Some(node) = ring.get_node(&key) {
            *counts.entry(node.to_string()).or_default() += 1;
        }
    }
    counts
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
