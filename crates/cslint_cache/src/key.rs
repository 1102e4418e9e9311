//! Cache key construction.

use serde::Serialize;

use crate::CacheError;

/// Identifies one cached lint result.
///
/// The digest covers the identifier, the serialized options and the module
/// source, so a change to any of them selects a different entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    identifier: String,
    digest: String,
}

impl CacheKey {
    /// Creates a key from already-serialized options.
    pub fn new(identifier: impl Into<String>, options: &str, source: &str) -> Self {
        let identifier = identifier.into();

        let mut hasher = blake3::Hasher::new();
        for part in [identifier.as_str(), options, source] {
            // Length prefixes keep ("ab", "c") and ("a", "bc") apart.
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }

        Self {
            identifier,
            digest: hasher.finalize().to_hex().to_string(),
        }
    }

    /// Creates a key, serializing `options` as JSON.
    pub fn from_options<T: Serialize + ?Sized>(
        identifier: impl Into<String>,
        options: &T,
        source: &str,
    ) -> Result<Self, CacheError> {
        let options =
            serde_json::to_string(options).map_err(|e| CacheError::serialization(e.to_string()))?;
        Ok(Self::new(identifier, &options, source))
    }

    /// The cache identifier this key was built with.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Hex-encoded BLAKE3 digest of the key parts.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}
