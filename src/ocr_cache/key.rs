//! Cache key derivation from image content

use sha2::{Digest, Sha256};

/// A filesystem-safe cache key derived from exact input bytes.
///
/// The key is the lowercase hex SHA-256 of the content followed by its
/// decimal byte length, e.g. `e3b0c442..._1234`. Including the length costs
/// nothing and keeps a truncation-shaped digest collision from being
/// trusted as a hit. Byte-identical inputs always derive the same key; no
/// normalization is applied, so different encodings of the same picture are
/// distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    /// Derive the key for the given bytes. Pure and total.
    pub fn derive(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = hasher.finalize();
        Self(format!("{hash:x}_{}", bytes.len()))
    }

    /// The file name this entry persists under.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
