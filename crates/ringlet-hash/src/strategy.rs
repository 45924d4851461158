//! The hash strategy trait.

use std::sync::Arc;

/// Maps a string key to a position in a fixed hash space.
///
/// Implementations must be pure: the same key always yields the same
/// position for the lifetime of the process, and no call may depend on
/// internal state. A ring only ever compares positions produced by one
/// strategy, so the output range may differ between implementations.
pub trait HashStrategy: Send + Sync {
    /// Hash `key` to a ring position.
    fn hash(&self, key: &str) -> u64;
}

impl<T: HashStrategy + ?Sized> HashStrategy for &T {
    fn hash(&self, key: &str) -> u64 {
        (**self).hash(key)
    }
}

impl<T: HashStrategy + ?Sized> HashStrategy for Box<T> {
    fn hash(&self, key: &str) -> u64 {
        (**self).hash(key)
    }
}

impl<T: HashStrategy + ?Sized> HashStrategy for Arc<T> {
    fn hash(&self, key: &str) -> u64 {
        (**self).hash(key)
    }
}
