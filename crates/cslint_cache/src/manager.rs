//! Cache store for lint results.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use cslint_engine::Issue;
use tokio::fs;
use tracing::{debug, info};

use crate::{CacheEntry, CacheError, CacheKey};

/// Cache directory used when none is configured.
pub const DEFAULT_CACHE_DIR: &str = ".cslint-cache";

const ENTRY_EXTENSION: &str = "rkyv";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stores lint results on disk, one file per key.
///
/// Writes go through a temporary file and a rename, so readers never see a
/// partial entry and concurrent writers of the same key simply replace each
/// other.
#[derive(Debug, Clone)]
pub struct ResultCache {
    /// Directory where cache files are stored.
    cache_dir: PathBuf,
}

impl ResultCache {
    /// Creates a cache rooted at `cache_dir`. The directory is created on first write.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Directory where cache files are stored.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Computes the BLAKE3 hash of content.
    pub fn hash_content(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", key.digest(), ENTRY_EXTENSION))
    }

    /// Returns the issues stored for `key`, if any.
    pub async fn get(&self, key: &CacheKey) -> Result<Option<Vec<Issue>>, CacheError> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(&bytes);
        let entry = rkyv::from_bytes::<CacheEntry, rkyv::rancor::Error>(&aligned)
            .map_err(|e| CacheError::corrupted(format!("{}: {}", path.display(), e)))?;

        if !entry.matches(key) {
            debug!("Ignoring mismatched cache entry at {}", path.display());
            return Ok(None);
        }

        Ok(Some(entry.issues))
    }

    /// Stores `issues` under `key`, replacing any previous entry.
    pub async fn store(&self, key: &CacheKey, issues: Vec<Issue>) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).await?;

        let entry = CacheEntry::new(key, issues);
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&entry)
            .map_err(|e| CacheError::serialization(e.to_string()))?;

        let path = self.entry_path(key);
        let temp_path = self.cache_dir.join(format!(
            "{}.{}-{}.tmp",
            key.digest(),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&temp_path, bytes.as_slice()).await?;
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        info!(
            "Saved {} cached issues to {}",
            entry.issues.len(),
            path.display()
        );
        Ok(())
    }

    /// Removes the entry for `key`. Missing entries are not an error.
    pub async fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes every entry in the cache directory.
    pub async fn clear(&self) -> Result<(), CacheError> {
        let mut dir = match fs::read_dir(&self.cache_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        info!(
            "Removed {} cache entries from {}",
            removed,
            self.cache_dir.display()
        );
        Ok(())
    }

    /// Returns the cached issues for `key`, or computes and stores them.
    ///
    /// `compute` runs on the blocking thread pool so the caller's runtime
    /// keeps making progress while the linter works. Cache failures are
    /// returned, never bypassed.
    pub async fn get_or_compute<F, E>(&self, key: &CacheKey, compute: F) -> Result<Vec<Issue>, E>
    where
        F: FnOnce() -> Result<Vec<Issue>, E> + Send + 'static,
        E: From<CacheError> + Send + 'static,
    {
        if let Some(issues) = self.get(key).await? {
            debug!("Cache hit for {}", key.digest());
            return Ok(issues);
        }

        debug!("Cache miss for {}", key.digest());
        let issues = match tokio::task::spawn_blocking(compute).await {
            Ok(result) => result?,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => return Err(CacheError::Interrupted(e.to_string()).into()),
        };

        self.store(key, issues.clone()).await?;
        Ok(issues)
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}
