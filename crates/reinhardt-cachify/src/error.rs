//! Error types for cache busting

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, CachifyError>;

/// Errors raised by the hasher, the interceptor and configuration loading
#[derive(Debug, Error)]
pub enum CachifyError {
	/// A dynamic entry point received a value that is not an asset name
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// The configuration lists no asset roots
	#[error("At least one asset root must be configured")]
	EmptyRoots,

	/// An asset could not be read while computing its hash
	#[error("Failed to read {}: {source}", .path.display())]
	FileRead {
		/// Absolute path that was read
		path: PathBuf,
		/// Underlying I/O failure
		#[source]
		source: io::Error,
	},

	/// I/O error while loading configuration
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	/// Configuration could not be parsed
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A rewritten request URI could not be parsed
	#[error("Invalid URI: {0}")]
	InvalidUri(#[from] http::uri::InvalidUri),

	/// Error raised by a downstream handler
	#[error("Handler error: {0}")]
	Handler(String),
}
