//! Asset path classification and hash decoration
//!
//! A logical filename is one of three shapes, decided before any hashing:
//! an external URL (contains `://`), an absolute server path (leading `/`),
//! or a path relative to the asset root.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// Length of a hex-encoded MD5 digest
pub const HASH_LEN: usize = 32;

/// Marker that identifies a fully qualified external URL
pub const EXTERNAL_MARKER: &str = "://";

static HASH_PREFIX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^/[0-9a-f]{32}").expect("hash prefix pattern is valid"));

/// Shape of a logical filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetPath<'a> {
	/// Fully qualified URL, never hashed
	External(&'a str),
	/// Server path with a leading slash
	Absolute(&'a str),
	/// Path relative to the asset root
	Relative(&'a str),
}

impl<'a> AssetPath<'a> {
	/// Classifies a logical filename
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_cachify::path::AssetPath;
	///
	/// assert!(matches!(AssetPath::classify("https://cdn.example.com/a.js"), AssetPath::External(_)));
	/// assert!(matches!(AssetPath::classify("/js/a.js"), AssetPath::Absolute(_)));
	/// assert!(matches!(AssetPath::classify("js/a.js"), AssetPath::Relative(_)));
	/// ```
	pub fn classify(filename: &'a str) -> Self {
		if filename.contains(EXTERNAL_MARKER) {
			Self::External(filename)
		} else if filename.starts_with('/') {
			Self::Absolute(filename)
		} else {
			Self::Relative(filename)
		}
	}

	/// Whether this is an external URL
	pub fn is_external(&self) -> bool {
		matches!(self, Self::External(_))
	}

	/// Splices `hash` into the filename
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_cachify::path::AssetPath;
	///
	/// let hash = "5d41402abc4b2a76b9719d911017c592";
	/// assert_eq!(
	///     AssetPath::classify("/js/a.js").decorate(hash),
	///     "/5d41402abc4b2a76b9719d911017c592/js/a.js"
	/// );
	/// assert_eq!(
	///     AssetPath::classify("js/a.js").decorate(hash),
	///     "5d41402abc4b2a76b9719d911017c592/js/a.js"
	/// );
	/// ```
	pub fn decorate(&self, hash: &str) -> String {
		match self {
			Self::External(url) => (*url).to_string(),
			Self::Absolute(path) => format!("/{hash}{path}"),
			Self::Relative(path) => format!("{hash}/{path}"),
		}
	}
}

/// Strips a leading `/<32 lowercase hex>` from a request path
///
/// Returns the remainder after the slash and the hash, or `None` when the
/// path does not start with a hash prefix.
///
/// # Example
///
/// ```rust
/// use reinhardt_cachify::path::strip_hash_prefix;
///
/// assert_eq!(
///     strip_hash_prefix("/5d41402abc4b2a76b9719d911017c592/js/a.js"),
///     Some("/js/a.js")
/// );
/// assert_eq!(strip_hash_prefix("/js/a.js"), None);
/// ```
pub fn strip_hash_prefix(path: &str) -> Option<&str> {
	if HASH_PREFIX.is_match(path) {
		Some(&path[HASH_LEN + 1..])
	} else {
		None
	}
}

/// Whether `path` tries to climb out of the asset root
pub fn is_traversal(path: &str) -> bool {
	Path::new(path)
		.components()
		.any(|component| matches!(component, Component::ParentDir))
}

/// Joins a logical filename onto an asset root
///
/// Leading slashes are dropped so absolute server paths stay inside `root`.
pub fn resolve(root: &Path, filename: &str) -> PathBuf {
	root.join(filename.trim_start_matches('/'))
}
