//! Hash strategies for consistent hash rings.
//!
//! This crate provides:
//! - [`HashStrategy`]: the single-method trait a ring uses to place keys.
//! - [`Md5Hash`], [`Sha256Hash`], [`Blake3Hash`]: digest-backed strategies
//!   spanning the full `u64` space.
//! - [`Murmur3Hash`]: fast non-cryptographic MurmurHash3 (x86, 32-bit).
//! - [`HashAlgorithm`]: a name for each strategy, for selecting one from
//!   configuration or the command line.
//!
//! Every strategy is stateless and deterministic, so a single instance can be
//! shared freely across threads.

mod algorithm;
mod digest;
mod error;
mod murmur;
mod strategy;

pub use algorithm::HashAlgorithm;
pub use digest::{Blake3Hash, Md5Hash, Sha256Hash};
pub use error::HashError;
pub use murmur::Murmur3Hash;
pub use strategy::HashStrategy;
