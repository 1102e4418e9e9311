//! # cslint_cache
//!
//! Result cache for cslint.
//!
//! This crate avoids re-running the linter on modules it has already seen.
//!
//! ## Cache Strategy
//!
//! 1. **Content-addressed**: an entry is keyed by the module source, the
//!    serialized loader options and the cache identifier
//! 2. **Config-aware**: any option change (a toggled rule, a new linter
//!    version) yields a different key
//! 3. **Shared directory**: one file per key, written atomically, so
//!    concurrent builds can read and write the same directory
//!
//! ## Storage
//!
//! Entries are stored using `rkyv` for zero-copy deserialization,
//! providing fast cache reads without parsing overhead.

mod entry;
mod error;
mod key;
mod manager;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use key::CacheKey;
pub use manager::{DEFAULT_CACHE_DIR, ResultCache};
