//! Consistent hash ring for assigning keys to a changing set of nodes.
//!
//! Each node is placed on the ring at `replicas` virtual positions, computed
//! by hashing `"{node}#{i}"` with a pluggable [`HashStrategy`]. A key belongs
//! to the first position at or after its own hash, wrapping around to the
//! lowest position past the end of the hash space. Adding or removing one node
//! only moves the keys adjacent to that node's positions.
//!
//! - [`ConsistentHashRing`]: the single-threaded ring.
//! - [`SharedRing`]: the same ring behind one lock, for sharing across threads.

mod error;
mod ring;
mod shared;

pub use error::RingError;
pub use ring::{ConsistentHashRing, DEFAULT_REPLICAS, Reassignment};
pub use ringlet_hash::HashStrategy;
pub use shared::SharedRing;
