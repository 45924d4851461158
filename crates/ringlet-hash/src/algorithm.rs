//! Named hash algorithms, for picking a strategy from configuration.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::{Blake3Hash, HashError, HashStrategy, Md5Hash, Murmur3Hash, Sha256Hash};

/// The bundled hash strategies, by name.
///
/// | Name      | Strategy         | Range       |
/// |-----------|------------------|-------------|
/// | `md5`     | [`Md5Hash`]      | `u64`       |
/// | `sha256`  | [`Sha256Hash`]   | `u64`       |
/// | `murmur3` | [`Murmur3Hash`]  | `[0, 2^32)` |
/// | `blake3`  | [`Blake3Hash`]   | `u64`       |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// [`Md5Hash`].
    Md5,
    /// [`Sha256Hash`].
    Sha256,
    /// [`Murmur3Hash`], the default.
    #[default]
    Murmur3,
    /// [`Blake3Hash`].
    Blake3,
}

impl HashAlgorithm {
    /// Every algorithm, in display order.
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha256,
        HashAlgorithm::Murmur3,
        HashAlgorithm::Blake3,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Murmur3 => "murmur3",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Build a boxed strategy for this algorithm.
    pub fn build(self) -> Box<dyn HashStrategy> {
        match self {
            HashAlgorithm::Md5 => Box::new(Md5Hash),
            HashAlgorithm::Sha256 => Box::new(Sha256Hash),
            HashAlgorithm::Murmur3 => Box::new(Murmur3Hash),
            HashAlgorithm::Blake3 => Box::new(Blake3Hash),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|algo| algo.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| HashError::UnknownAlgorithm(s.to_string()))
    }
}
