//! Configuration for cache busting
//!
//! Configuration is built once at startup and shared read-only afterwards.
//! It can be assembled with the `with_*` builder methods or deserialized from
//! JSON, where `root` accepts either a single path or a list of paths.

use crate::error::{CachifyError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Bundle name to ordered list of source files
pub type BundleMap = HashMap<String, Vec<String>>;

/// Cache busting configuration
///
/// # Example
///
/// ```rust
/// use reinhardt_cachify::CachifyConfig;
///
/// let config = CachifyConfig::new("/srv/static")
///     .with_production(false)
///     .with_js_bundle("app.js", vec!["a.js".to_string(), "b.js".to_string()]);
///
/// assert!(!config.production);
/// assert!(config.is_bundle("app.js"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachifyConfig {
	/// Reference single minified bundles instead of their sources
	#[serde(default = "default_production")]
	pub production: bool,

	/// Hash asset URLs even outside production mode
	#[serde(default)]
	pub debug: bool,

	/// Asset roots; the first one is used for hashing and existence checks
	#[serde(
		rename = "root",
		default = "default_roots",
		deserialize_with = "deserialize_roots"
	)]
	pub roots: Vec<PathBuf>,

	/// Script bundles
	#[serde(default)]
	pub js: BundleMap,

	/// Stylesheet bundles
	#[serde(default)]
	pub css: BundleMap,
}

fn default_production() -> bool {
	true
}

fn default_roots() -> Vec<PathBuf> {
	vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RootSetting {
	Single(PathBuf),
	Many(Vec<PathBuf>),
}

fn deserialize_roots<'de, D>(deserializer: D) -> std::result::Result<Vec<PathBuf>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match RootSetting::deserialize(deserializer)? {
		RootSetting::Single(root) => vec![root],
		RootSetting::Many(roots) => roots,
	})
}

impl CachifyConfig {
	/// Creates a production configuration with a single asset root
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			production: true,
			debug: false,
			roots: vec![root.into()],
			js: BundleMap::new(),
			css: BundleMap::new(),
		}
	}

	/// Sets production mode
	pub fn with_production(mut self, production: bool) -> Self {
		self.production = production;
		self
	}

	/// Sets debug mode
	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	/// Appends an additional asset root
	pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.roots.push(root.into());
		self
	}

	/// Replaces the asset roots
	pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
		self.roots = roots;
		self
	}

	/// Registers a script bundle
	pub fn with_js_bundle(mut self, name: impl Into<String>, sources: Vec<String>) -> Self {
		self.js.insert(name.into(), sources);
		self
	}

	/// Registers a stylesheet bundle
	pub fn with_css_bundle(mut self, name: impl Into<String>, sources: Vec<String>) -> Self {
		self.css.insert(name.into(), sources);
		self
	}

	/// Parses and validates a JSON configuration
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_cachify::CachifyConfig;
	///
	/// let config = CachifyConfig::from_json_str(r#"{"root": "/srv/static", "debug": true}"#).unwrap();
	/// assert!(config.production);
	/// assert!(config.debug);
	/// assert_eq!(config.roots.len(), 1);
	/// ```
	pub fn from_json_str(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads and validates a JSON configuration file
	pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
		let content = tokio::fs::read_to_string(path).await?;
		Self::from_json_str(&content)
	}

	/// Checks invariants that cannot be expressed in the type
	pub fn validate(&self) -> Result<()> {
		if self.roots.is_empty() {
			return Err(CachifyError::EmptyRoots);
		}
		Ok(())
	}

	/// Root used for hashing and existence checks
	pub fn primary_root(&self) -> Result<&Path> {
		self.roots
			.first()
			.map(PathBuf::as_path)
			.ok_or(CachifyError::EmptyRoots)
	}

	/// Whether asset URLs get a content hash
	pub fn hashing_enabled(&self) -> bool {
		self.production || self.debug
	}

	/// Whether `name` is a script or stylesheet bundle
	pub fn is_bundle(&self, name: &str) -> bool {
		self.js.contains_key(name) || self.css.contains_key(name)
	}
}

impl Default for CachifyConfig {
	fn default() -> Self {
		Self {
			production: default_production(),
			debug: false,
			roots: default_roots(),
			js: BundleMap::new(),
			css: BundleMap::new(),
		}
	}
}
