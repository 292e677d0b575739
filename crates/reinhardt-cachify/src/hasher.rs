//! Hash-decorated asset URLs

use crate::cache::{CacheEntry, HashCache};
use crate::config::CachifyConfig;
use crate::error::{CachifyError, Result};
use crate::fs::AssetFs;
use crate::path::{AssetPath, is_traversal, resolve};
use md5::{Digest, Md5};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Rewrites logical filenames into content-hashed URLs
///
/// Hashes are read from the first configured root and memoized in the
/// shared [`HashCache`], so each file is read at most once per process on
/// the happy path.
pub struct UrlHasher {
	config: Arc<CachifyConfig>,
	cache: HashCache,
	fs: Arc<dyn AssetFs>,
	root: PathBuf,
}

impl UrlHasher {
	/// Creates a hasher over validated configuration
	///
	/// # Errors
	///
	/// Returns [`CachifyError::EmptyRoots`] when no root is configured.
	pub fn new(config: Arc<CachifyConfig>, cache: HashCache, fs: Arc<dyn AssetFs>) -> Result<Self> {
		config.validate()?;
		let root = config.primary_root()?.to_path_buf();
		Ok(Self {
			config,
			cache,
			fs,
			root,
		})
	}

	/// Configuration the hasher was built with
	pub fn config(&self) -> &CachifyConfig {
		&self.config
	}

	/// Cache shared with the interceptor
	pub fn cache(&self) -> &HashCache {
		&self.cache
	}

	/// Returns the hash-decorated URL for `filename`
	///
	/// External URLs and every filename outside production/debug mode are
	/// returned unchanged without touching the disk. When the file cannot be
	/// read the failure is logged and the unhashed filename is returned.
	///
	/// # Example
	///
	/// ```rust,ignore
	/// let url = hasher.hashify("/js/app.js").await;
	/// assert_eq!(url, "/5d41402abc4b2a76b9719d911017c592/js/app.js");
	/// ```
	pub async fn hashify(&self, filename: &str) -> String {
		let asset = AssetPath::classify(filename);
		if asset.is_external() || !self.config.hashing_enabled() {
			return filename.to_string();
		}
		if is_traversal(filename) {
			tracing::warn!("Refusing to hash {} outside the asset root", filename);
			return filename.to_string();
		}

		match self.content_hash(filename).await {
			Ok(hash) => asset.decorate(&hash),
			Err(err) => {
				tracing::error!("Cache busting skipped for {}: {}", filename, err);
				filename.to_string()
			}
		}
	}

	/// Dynamic variant of [`hashify`](Self::hashify) for template values
	///
	/// # Errors
	///
	/// Returns [`CachifyError::InvalidArgument`] when `value` is not a string.
	/// The cache is left untouched in that case.
	pub async fn hashify_value(&self, value: &Value) -> Result<String> {
		let filename = value.as_str().ok_or_else(|| {
			CachifyError::InvalidArgument(format!("asset name must be a string, got {value}"))
		})?;
		Ok(self.hashify(filename).await)
	}

	/// Returns the cached hash for `filename`, computing it on a miss
	///
	/// Filenames already recorded as missing are not retried.
	///
	/// # Errors
	///
	/// Returns [`CachifyError::InvalidArgument`] for filenames with `..`
	/// components and [`CachifyError::FileRead`] when the file cannot be read.
	pub async fn content_hash(&self, filename: &str) -> Result<String> {
		if is_traversal(filename) {
			return Err(CachifyError::InvalidArgument(format!(
				"{filename} escapes the asset root"
			)));
		}

		match self.cache.lookup(filename) {
			Some(CacheEntry {
				hash: Some(hash), ..
			}) => {
				tracing::debug!("Hash cache hit for {}", filename);
				return Ok(hash);
			}
			Some(CacheEntry { exists: false, .. }) => {
				return Err(CachifyError::FileRead {
					path: resolve(&self.root, filename),
					source: std::io::Error::new(
						std::io::ErrorKind::NotFound,
						"previously recorded as missing",
					),
				});
			}
			_ => {}
		}

		let hash = self.digest(filename).await?;
		self.cache.store(filename, CacheEntry::hashed(hash.clone()));
		tracing::debug!("Hash cache miss for {}, stored {}", filename, hash);
		Ok(hash)
	}

	/// Reads `filename` from the primary root and returns its MD5 hex digest
	///
	/// Bypasses the cache.
	pub async fn digest(&self, filename: &str) -> Result<String> {
		let path = resolve(&self.root, filename);
		let content = self
			.fs
			.read(&path)
			.await
			.map_err(|source| CachifyError::FileRead { path, source })?;
		Ok(hex::encode(Md5::digest(&content)))
	}
}
