//! Hash cache and entry structures

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// What is known about one logical filename
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
	/// Whether the file exists under the primary root
	pub exists: bool,

	/// 32-character hex MD5 digest of the file contents, once computed
	pub hash: Option<String>,
}

impl CacheEntry {
	/// Creates an entry for an existing file with a known hash
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_cachify::cache::CacheEntry;
	///
	/// let entry = CacheEntry::hashed("5d41402abc4b2a76b9719d911017c592");
	/// assert!(entry.exists);
	/// assert!(entry.hash.is_some());
	/// ```
	pub fn hashed(hash: impl Into<String>) -> Self {
		Self {
			exists: true,
			hash: Some(hash.into()),
		}
	}

	/// Creates an entry that only records existence
	pub fn existence(exists: bool) -> Self {
		Self { exists, hash: None }
	}
}

/// In-memory cache keyed by logical filename
///
/// Entries are created lazily and live for the lifetime of the process;
/// assets are assumed immutable until the next deploy restarts the server.
/// Cloning yields a handle to the same underlying map.
///
/// Two tasks missing on the same filename at once will both compute and
/// store its hash. Both results are identical, so the last write wins
/// without changing the observable value.
#[derive(Debug, Clone, Default)]
pub struct HashCache {
	entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl HashCache {
	/// Creates an empty cache
	pub fn new() -> Self {
		Self::default()
	}

	/// Looks up the entry for `filename`
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_cachify::cache::{CacheEntry, HashCache};
	///
	/// let cache = HashCache::new();
	/// assert!(cache.lookup("app.js").is_none());
	///
	/// cache.store("app.js", CacheEntry::existence(false));
	/// assert_eq!(cache.lookup("app.js"), Some(CacheEntry::existence(false)));
	/// ```
	pub fn lookup(&self, filename: &str) -> Option<CacheEntry> {
		let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
		entries.get(filename).cloned()
	}

	/// Stores `entry` for `filename`, replacing any previous entry
	pub fn store(&self, filename: impl Into<String>, entry: CacheEntry) {
		let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
		entries.insert(filename.into(), entry);
	}

	/// Records whether `filename` exists, keeping a previously computed hash
	pub fn record_exists(&self, filename: impl Into<String>, exists: bool) {
		let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
		entries.entry(filename.into()).or_default().exists = exists;
	}

	/// Number of cached filenames
	pub fn len(&self) -> usize {
		self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
	}

	/// Whether nothing has been cached yet
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
