//! Thread-safe ring handle.
//!
//! [`SharedRing`] puts one [`ConsistentHashRing`] behind a single `RwLock`.
//! Every mutation holds the write lock for its whole multi-position update,
//! so concurrent readers see either the ring before the change or after it,
//! never a node that is half placed.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ringlet_hash::HashStrategy;

use crate::error::RingError;
use crate::ring::ConsistentHashRing;

/// A [`ConsistentHashRing`] that can be shared across threads (wrap it in an
/// `Arc`).
///
/// Observers return owned values because the read lock is released before
/// they return.
pub struct SharedRing<H = Box<dyn HashStrategy>> {
    ring: RwLock<ConsistentHashRing<H>>,
}

impl<H: HashStrategy> SharedRing<H> {
    /// Create an empty shared ring.
    pub fn new(hash: H, replicas: u32) -> Result<Self, RingError> {
        Ok(Self::from_ring(ConsistentHashRing::new(hash, replicas)?))
    }

    /// Wrap an existing ring.
    pub fn from_ring(ring: ConsistentHashRing<H>) -> Self {
        Self {
            ring: RwLock::new(ring),
        }
    }

    /// Unwrap into the inner ring.
    pub fn into_inner(self) -> ConsistentHashRing<H> {
        self.ring.into_inner().expect("ring lock poisoned")
    }

    pub fn add_node(&self, node: &str) {
        self.write().add_node(node);
    }

    pub fn remove_node(&self, node: &str) {
        self.write().remove_node(node);
    }

    pub fn purge_node(&self, node: &str) -> usize {
        self.write().purge_node(node)
    }

    pub fn set_replicas(&self, replicas: u32) -> Result<(), RingError> {
        self.write().set_replicas(replicas)
    }

    /// Apply several mutations under one write lock.
    ///
    /// Readers observe either none or all of the changes made by `f`.
    pub fn update<R>(&self, f: impl FnOnce(&mut ConsistentHashRing<H>) -> R) -> R {
        f(&mut *self.write())
    }

    /// Run `f` against a consistent view of the ring.
    pub fn inspect<R>(&self, f: impl FnOnce(&ConsistentHashRing<H>) -> R) -> R {
        f(&*self.read())
    }

    /// Return the node responsible for `key`, or `None` if the ring is empty.
    pub fn get_node(&self, key: &str) -> Option<String> {
        self.read().get_node(key).map(str::to_string)
    }

    pub fn get_nodes(&self, key: &str, count: usize) -> Vec<String> {
        self.read()
            .get_nodes(key, count)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn list_nodes(&self) -> Vec<String> {
        self.read().list_nodes()
    }

    pub fn node_count(&self) -> usize {
        self.read().node_count()
    }

    pub fn position_count(&self) -> usize {
        self.read().position_count()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn replicas(&self) -> u32 {
        self.read().replicas()
    }

    pub fn positions(&self) -> Vec<(u64, String)> {
        self.read().positions()
    }

    fn read(&self) -> RwLockReadGuard<'_, ConsistentHashRing<H>> {
        self.ring.read().expect("ring lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConsistentHashRing<H>> {
        self.ring.write().expect("ring lock poisoned")
    }
}

impl<H> std::fmt::Debug for SharedRing<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRing").finish_non_exhaustive()
    }
}
