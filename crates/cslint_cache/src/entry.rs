//! Cache entry types.

use cslint_engine::Issue;

use crate::CacheKey;

/// A stored lint result.
#[derive(Debug, Clone, PartialEq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct CacheEntry {
    /// Identifier the result was computed under.
    pub identifier: String,

    /// Digest of the key the result was stored under.
    pub digest: String,

    /// Cached issues, in engine order.
    pub issues: Vec<Issue>,

    /// Timestamp when this entry was created.
    pub created_at: u64,
}

impl CacheEntry {
    /// Creates a new cache entry.
    pub fn new(key: &CacheKey, issues: Vec<Issue>) -> Self {
        Self {
            identifier: key.identifier().to_string(),
            digest: key.digest().to_string(),
            issues,
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Checks if this entry was stored for `key`.
    pub fn matches(&self, key: &CacheKey) -> bool {
        self.identifier == key.identifier() && self.digest == key.digest()
    }
}
