//! Error types for hash strategy selection.

/// Errors that can occur while selecting a hash strategy.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// The name does not match any known algorithm.
    #[error("unknown hash algorithm: {0:?} (expected one of md5, sha256, murmur3, blake3)")]
    UnknownAlgorithm(String),
}
