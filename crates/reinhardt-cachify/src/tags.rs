//! Script and stylesheet tag generation
//!
//! Outside production mode a bundle expands to one tag per source file so
//! unminified sources are served individually. In production, or for names
//! that are not bundles, a single tag references the name itself.

use crate::config::{BundleMap, CachifyConfig};
use crate::error::{CachifyError, Result};
use crate::hasher::UrlHasher;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Kind of asset a tag references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFamily {
	/// `<script>` tags, bundles from `js`
	Script,
	/// `<link rel="stylesheet">` tags, bundles from `css`
	Stylesheet,
}

impl AssetFamily {
	/// Wraps `url` in this family's tag
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_cachify::tags::AssetFamily;
	///
	/// assert_eq!(
	///     AssetFamily::Script.tag("/app.js"),
	///     r#"<script src="/app.js"></script>"#
	/// );
	/// ```
	pub fn tag(&self, url: &str) -> String {
		match self {
			Self::Script => format!(r#"<script src="{url}"></script>"#),
			Self::Stylesheet => {
				format!(r#"<link rel="stylesheet" type="text/css" href="{url}">"#)
			}
		}
	}

	/// Bundle map for this family
	pub fn bundles<'a>(&self, config: &'a CachifyConfig) -> &'a BundleMap {
		match self {
			Self::Script => &config.js,
			Self::Stylesheet => &config.css,
		}
	}
}

impl fmt::Display for AssetFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Script => write!(f, "js"),
			Self::Stylesheet => write!(f, "css"),
		}
	}
}

/// Template helpers exposed to the rendering layer
///
/// Cheap to clone; [`CachifyMiddleware`](crate::CachifyMiddleware) inserts
/// one into every request's extensions.
#[derive(Clone)]
pub struct AssetTags {
	hasher: Arc<UrlHasher>,
}

impl AssetTags {
	/// Creates helpers backed by `hasher`
	pub fn new(hasher: Arc<UrlHasher>) -> Self {
		Self { hasher }
	}

	/// Script tags for `name`
	pub async fn cachify_js(&self, name: &str) -> String {
		self.render(AssetFamily::Script, name).await
	}

	/// Stylesheet tags for `name`
	pub async fn cachify_css(&self, name: &str) -> String {
		self.render(AssetFamily::Stylesheet, name).await
	}

	/// Bare hashed URL for assets referenced outside script or link tags
	pub async fn cachify(&self, name: &str) -> String {
		self.hasher.hashify(name).await
	}

	/// [`cachify_js`](Self::cachify_js) for a template value
	///
	/// # Errors
	///
	/// Returns [`CachifyError::InvalidArgument`] when `value` is not a string.
	pub async fn cachify_js_value(&self, value: &Value) -> Result<String> {
		self.render_value(AssetFamily::Script, value).await
	}

	/// [`cachify_css`](Self::cachify_css) for a template value
	///
	/// # Errors
	///
	/// Returns [`CachifyError::InvalidArgument`] when `value` is not a string.
	pub async fn cachify_css_value(&self, value: &Value) -> Result<String> {
		self.render_value(AssetFamily::Stylesheet, value).await
	}

	/// Renders the tags for `name`, one per line
	pub async fn render(&self, family: AssetFamily, name: &str) -> String {
		let config = self.hasher.config();
		let sources = if config.production {
			None
		} else {
			family.bundles(config).get(name)
		};

		match sources {
			Some(sources) => {
				let mut tags = Vec::with_capacity(sources.len());
				for source in sources {
					tags.push(family.tag(&self.hasher.hashify(source).await));
				}
				tags.join("\n")
			}
			None => family.tag(&self.hasher.hashify(name).await),
		}
	}

	async fn render_value(&self, family: AssetFamily, value: &Value) -> Result<String> {
		let name = value.as_str().ok_or_else(|| {
			CachifyError::InvalidArgument(format!("{family} bundle name must be a string, got {value}"))
		})?;
		Ok(self.render(family, name).await)
	}
}
