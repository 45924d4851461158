//! Cryptographic digest strategies.
//!
//! Each strategy hashes the key's UTF-8 bytes and reads the first 8 bytes of
//! the digest as a big-endian `u64`. That is the digest taken as one large
//! unsigned integer and shifted down to 64 bits, so positions keep the same
//! relative order the full digest would give them (ties aside).

use md5::Md5;
use sha2::{Digest, Sha256};

use crate::HashStrategy;

/// MD5 digest strategy.
///
/// Not collision resistant against an adversary, but evenly distributed and
/// stable across processes and platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Md5Hash;

impl HashStrategy for Md5Hash {
    fn hash(&self, key: &str) -> u64 {
        digest_position::<Md5>(key)
    }
}

/// SHA-256 digest strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hash;

impl HashStrategy for Sha256Hash {
    fn hash(&self, key: &str) -> u64 {
        digest_position::<Sha256>(key)
    }
}

/// BLAKE3 digest strategy.
///
/// Cryptographic strength at a fraction of SHA-256's cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hash;

impl HashStrategy for Blake3Hash {
    fn hash(&self, key: &str) -> u64 {
        leading_u64(blake3::hash(key.as_bytes()).as_bytes())
    }
}

fn digest_position<D: Digest>(key: &str) -> u64 {
    leading_u64(&D::digest(key.as_bytes()))
}

/// Interpret the first 8 bytes of a digest as a big-endian integer.
fn leading_u64(digest: &[u8]) -> u64 {
    let bytes: [u8; 8] = digest[..8].try_into().expect("digest is at least 8 bytes");
    u64::from_be_bytes(bytes)
}
