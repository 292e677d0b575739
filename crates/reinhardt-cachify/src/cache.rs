//! Existence and content-hash cache
//!
//! This module memoizes disk reads and existence checks for asset files
//! during request handling and page rendering.

pub mod hash_cache;

pub use hash_cache::{CacheEntry, HashCache};
