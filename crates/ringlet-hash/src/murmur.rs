//! MurmurHash3 strategy.

use std::io::Cursor;

use crate::HashStrategy;

/// MurmurHash3 (x86, 32-bit variant, seed 0).
///
/// The fastest of the bundled strategies. Positions fall in `[0, 2^32)`,
/// which is plenty for rings of a few million virtual replicas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Murmur3Hash;

impl Murmur3Hash {
    const SEED: u32 = 0;
}

impl HashStrategy for Murmur3Hash {
    fn hash(&self, key: &str) -> u64 {
        let hash = murmur3::murmur3_32(&mut Cursor::new(key.as_bytes()), Self::SEED)
            .expect("reading from an in-memory cursor cannot fail");
        u64::from(hash)
    }
}
