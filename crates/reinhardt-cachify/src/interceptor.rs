//! Hash-prefixed request detection
//!
//! Each request moves from unexamined to resolved in a single pass. A path
//! that starts with `/<32 lowercase hex>` is a candidate alias; the remainder
//! after the hash is its true path. The alias is honored only when the true
//! path names a bundle or an existing file under the primary root.
//!
//! Negative existence results are cached for the lifetime of the process.
//! Every distinct hash-shaped path for an unknown file therefore costs one
//! filesystem check, and repeats of it cost none.

use crate::cache::HashCache;
use crate::config::CachifyConfig;
use crate::error::Result;
use crate::fs::AssetFs;
use crate::path::{is_traversal, resolve, strip_hash_prefix};
use std::path::PathBuf;
use std::sync::Arc;

/// `Cache-Control` value attached to rewritten requests (one year)
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=31536000";

/// How a request path was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
	/// No hash prefix; the request continues untouched
	PassThrough,
	/// Legitimate alias; the request should be served from `true_path`
	Rewritten {
		/// Path with the hash prefix removed
		true_path: String,
	},
	/// Hash-shaped path for an unknown asset; the request continues untouched
	Rejected {
		/// Path with the hash prefix removed
		true_path: String,
	},
}

impl Interception {
	/// Whether the request path should be replaced
	pub fn is_rewritten(&self) -> bool {
		matches!(self, Self::Rewritten { .. })
	}
}

/// Decides whether a hash-prefixed path is a cache-busted asset
pub struct Interceptor {
	config: Arc<CachifyConfig>,
	cache: HashCache,
	fs: Arc<dyn AssetFs>,
	root: PathBuf,
}

impl Interceptor {
	/// Creates an interceptor over validated configuration
	///
	/// # Errors
	///
	/// Returns [`CachifyError::EmptyRoots`](crate::CachifyError::EmptyRoots)
	/// when no root is configured.
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

	/// Resolves a request path
	pub async fn inspect(&self, path: &str) -> Interception {
		let Some(true_path) = strip_hash_prefix(path) else {
			return Interception::PassThrough;
		};

		if self.is_legitimate(true_path).await {
			tracing::debug!("Rewriting {} to {}", path, true_path);
			Interception::Rewritten {
				true_path: true_path.to_string(),
			}
		} else {
			Interception::Rejected {
				true_path: true_path.to_string(),
			}
		}
	}

	/// Whether `true_path` is a bundle or an existing asset
	///
	/// Bundle membership is checked first, then the cache, and only then the
	/// filesystem. The filesystem answer is cached either way.
	pub async fn is_legitimate(&self, true_path: &str) -> bool {
		if !true_path.starts_with('/') {
			return false;
		}

		if is_traversal(true_path) {
			tracing::warn!("Path traversal attempt in hashed URL: {}", true_path);
			return false;
		}

		if self.config.is_bundle(true_path) || self.config.is_bundle(&true_path[1..]) {
			return true;
		}

		if let Some(entry) = self.cache.lookup(true_path) {
			return entry.exists;
		}

		let exists = self.fs.exists(&resolve(&self.root, true_path)).await;
		self.cache.record_exists(true_path, exists);
		if !exists {
			tracing::warn!(
				"Hashed URL requested for unknown asset {}; recording as missing",
				true_path
			);
		}
		exists
	}
}
