//! Consistent hash ring implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ringlet_hash::HashStrategy;
use tracing::{debug, trace};

use crate::error::RingError;

/// Replica count used by [`ConsistentHashRing::with_default_replicas`].
pub const DEFAULT_REPLICAS: u32 = 100;

/// A key whose owner differs between two rings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// The key that moved.
    pub key: String,
    /// Owner in the old ring (`None` if the old ring was empty).
    pub from: Option<String>,
    /// Owner in the new ring (`None` if the new ring is empty).
    pub to: Option<String>,
}

/// Consistent hash ring with virtual replicas.
///
/// Each node occupies `replicas` positions on the ring, one per virtual
/// replica `"{node}#{i}"`. Positions live in a single ordered map, so the
/// position -> owner mapping and the sorted position index are always the same
/// set of keys.
///
/// Lookups walk clockwise from the key's hash to the first occupied position
/// at or after it, wrapping around to the lowest position.
#[derive(Clone)]
pub struct ConsistentHashRing<H = Box<dyn HashStrategy>> {
    /// Occupied ring positions -> owning node.
    positions: BTreeMap<u64, String>,
    /// Strategy used for both virtual replicas and lookup keys.
    hash: H,
    /// Virtual replicas placed per node by `add_node`.
    replicas: u32,
}

impl<H: HashStrategy> ConsistentHashRing<H> {
    /// Create an empty ring.
    ///
    /// Returns [`RingError::ZeroReplicas`] if `replicas` is 0.
    pub fn new(hash: H, replicas: u32) -> Result<Self, RingError> {
        if replicas == 0 {
            return Err(RingError::ZeroReplicas);
        }
        Ok(Self {
            positions: BTreeMap::new(),
            hash,
            replicas,
        })
    }

    /// Create an empty ring with [`DEFAULT_REPLICAS`] replicas per node.
    pub fn with_default_replicas(hash: H) -> Self {
        Self {
            positions: BTreeMap::new(),
            hash,
            replicas: DEFAULT_REPLICAS,
        }
    }

    /// Place `node` on the ring at each of its virtual replica positions.
    ///
    /// If a position is already occupied (a hash collision with another
    /// replica, or the node was added before), `node` takes it over.
    pub fn add_node(&mut self, node: &str) {
        for i in 0..self.replicas {
            let pos = self.replica_position(node, i);
            if let Some(previous) = self.positions.insert(pos, node.to_string()) {
                if previous != node {
                    trace!(pos, %previous, node, "virtual replica collision, position reassigned");
                }
            }
        }
        debug!(node, replicas = self.replicas, "added node to ring");
    }

    /// Remove `node`'s virtual replica positions from the ring.
    ///
    /// Positions are recomputed from the current hash strategy and replica
    /// count, so a node added under a different replica count leaves
    /// positions behind; use [`purge_node`](Self::purge_node) for those.
    /// Every recomputed position is freed, even one that a later colliding
    /// node took over. Removing an unknown node does nothing.
    pub fn remove_node(&mut self, node: &str) {
        let mut removed = 0usize;
        for i in 0..self.replicas {
            let pos = self.replica_position(node, i);
            if self.positions.remove(&pos).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(node, removed, "removed node from ring");
        }
    }

    /// Remove every position currently owned by `node`, however it got there.
    ///
    /// Returns the number of positions removed.
    pub fn purge_node(&mut self, node: &str) -> usize {
        let before = self.positions.len();
        self.positions.retain(|_, owner| owner != node);
        let removed = before - self.positions.len();
        if removed > 0 {
            debug!(node, removed, "purged node from ring");
        }
        removed
    }

    /// Return the node responsible for `key`, or `None` if the ring is empty.
    pub fn get_node(&self, key: &str) -> Option<&str> {
        let pos = self.hash.hash(key);
        self.positions
            .range(pos..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(_, node)| node.as_str())
    }

    /// Return up to `count` distinct nodes for `key`, in ring order.
    ///
    /// The first entry is always [`get_node`](Self::get_node)'s answer; the
    /// rest are the next distinct owners found walking clockwise. If fewer
    /// than `count` nodes exist, every node is returned once.
    pub fn get_nodes(&self, key: &str, count: usize) -> Vec<&str> {
        if count == 0 || self.positions.is_empty() {
            return Vec::new();
        }

        let pos = self.hash.hash(key);
        let max_distinct = count.min(self.node_count());
        let mut owners: Vec<&str> = Vec::with_capacity(max_distinct);

        // Everything >= pos, then wrap around to the start.
        let after = self.positions.range(pos..);
        let before = self.positions.range(..pos);

        for (_, node) in after.chain(before) {
            if !owners.contains(&node.as_str()) {
                owners.push(node);
                if owners.len() == max_distinct {
                    break;
                }
            }
        }

        owners
    }

    /// Return the distinct nodes on the ring, sorted.
    pub fn list_nodes(&self) -> Vec<String> {
        self.distinct_nodes().into_iter().map(str::to_string).collect()
    }

    /// Whether `node` owns at least one position.
    pub fn contains_node(&self, node: &str) -> bool {
        self.positions.values().any(|owner| owner == node)
    }

    /// Number of distinct nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.distinct_nodes().len()
    }

    /// Number of occupied positions.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Replicas placed per node by the next `add_node`/`remove_node`.
    pub fn replicas(&self) -> u32 {
        self.replicas
    }

    /// Change the replica count used by subsequent add and remove calls.
    ///
    /// Positions already on the ring are left as they are.
    pub fn set_replicas(&mut self, replicas: u32) -> Result<(), RingError> {
        if replicas == 0 {
            return Err(RingError::ZeroReplicas);
        }
        self.replicas = replicas;
        Ok(())
    }

    pub fn hash_strategy(&self) -> &H {
        &self.hash
    }

    /// Snapshot of every occupied position and its owner, in ring order.
    pub fn positions(&self) -> Vec<(u64, String)> {
        self.positions
            .iter()
            .map(|(pos, node)| (*pos, node.clone()))
            .collect()
    }

    /// Compare the owners of `keys` in two rings.
    ///
    /// Returns one [`Reassignment`] per key whose owner differs, in the order
    /// the keys were given.
    pub fn reassignments<H2, K>(
        old: &Self,
        new: &ConsistentHashRing<H2>,
        keys: &[K],
    ) -> Vec<Reassignment>
    where
        H2: HashStrategy,
        K: AsRef<str>,
    {
        keys.iter()
            .filter_map(|key| {
                let key = key.as_ref();
                let from = old.get_node(key);
                let to = new.get_node(key);
                (from != to).then(|| Reassignment {
                    key: key.to_string(),
                    from: from.map(str::to_string),
                    to: to.map(str::to_string),
                })
            })
            .collect()
    }

    fn distinct_nodes(&self) -> BTreeSet<&str> {
        self.positions.values().map(String::as_str).collect()
    }

    fn replica_position(&self, node: &str, replica: u32) -> u64 {
        self.hash.hash(&format!("{node}#{replica}"))
    }
}

impl<H> fmt::Debug for ConsistentHashRing<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsistentHashRing")
            .field("replicas", &self.replicas)
            .field("positions", &self.positions.len())
            .finish_non_exhaustive()
    }
}
