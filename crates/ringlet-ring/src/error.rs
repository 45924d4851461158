//! Error types for ring construction and configuration.

/// Errors that can occur when configuring a ring.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RingError {
    /// A ring needs at least one virtual replica per node.
    #[error("replica count must be at least 1")]
    ZeroReplicas,
}
