//! Wiring of configuration, cache, hasher and middleware

use crate::cache::HashCache;
use crate::config::CachifyConfig;
use crate::error::Result;
use crate::fs::{AssetFs, TokioFs};
use crate::hasher::UrlHasher;
use crate::interceptor::Interceptor;
use crate::middleware::CachifyMiddleware;
use crate::tags::AssetTags;
use std::sync::Arc;

/// Cache busting for one server process
///
/// Owns the single [`HashCache`] shared by the template helpers and the
/// request interceptor. Build it once at startup.
pub struct Cachify {
	config: Arc<CachifyConfig>,
	cache: HashCache,
	hasher: Arc<UrlHasher>,
	middleware: Arc<CachifyMiddleware>,
}

impl Cachify {
	/// Creates cache busting that reads assets through `tokio::fs`
	///
	/// # Errors
	///
	/// Returns an error when the configuration is invalid.
	pub fn new(config: CachifyConfig) -> Result<Self> {
		Self::with_fs(config, Arc::new(TokioFs))
	}

	/// Creates cache busting over a custom filesystem
	///
	/// # Errors
	///
	/// Returns an error when the configuration is invalid.
	pub fn with_fs(config: CachifyConfig, fs: Arc<dyn AssetFs>) -> Result<Self> {
		config.validate()?;
		let config = Arc::new(config);
		let cache = HashCache::new();

		let hasher = Arc::new(UrlHasher::new(config.clone(), cache.clone(), fs.clone())?);
		let interceptor = Interceptor::new(config.clone(), cache.clone(), fs)?;
		let middleware = Arc::new(CachifyMiddleware::new(
			interceptor,
			AssetTags::new(hasher.clone()),
		));

		Ok(Self {
			config,
			cache,
			hasher,
			middleware,
		})
	}

	/// Active configuration
	pub fn config(&self) -> &CachifyConfig {
		&self.config
	}

	/// Process-wide hash cache
	pub fn cache(&self) -> &HashCache {
		&self.cache
	}

	/// URL hasher
	pub fn hasher(&self) -> &UrlHasher {
		&self.hasher
	}

	/// Template helpers
	pub fn tags(&self) -> AssetTags {
		self.middleware.tags().clone()
	}

	/// Middleware to install before static file resolution
	pub fn middleware(&self) -> Arc<CachifyMiddleware> {
		self.middleware.clone()
	}

	/// Hashes every bundle name and bundle source ahead of the first request
	///
	/// Only does work when hashing is enabled. Files that cannot be read are
	/// logged and left out of the cache. Returns the number of files hashed.
	pub async fn preload(&self) -> usize {
		if !self.config.hashing_enabled() {
			return 0;
		}

		let mut names: Vec<&str> = Vec::new();
		for bundles in [&self.config.js, &self.config.css] {
			for (name, sources) in bundles {
				names.push(name);
				names.extend(sources.iter().map(String::as_str));
			}
		}
		names.sort_unstable();
		names.dedup();

		let mut hashed = 0;
		for name in names {
			match self.hasher.content_hash(name).await {
				Ok(_) => hashed += 1,
				Err(err) => tracing::warn!("Could not preload hash for {}: {}", name, err),
			}
		}

		tracing::debug!("Preloaded {} asset hashes", hashed);
		hashed
	}
}
