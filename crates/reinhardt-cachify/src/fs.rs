//! Filesystem access for asset hashing
//!
//! The hasher and the interceptor only ever read bytes and check existence.
//! Both go through [`AssetFs`] so request handling never blocks the runtime
//! and tests can observe every disk access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Read-only view of the asset roots
#[async_trait]
pub trait AssetFs: Send + Sync {
	/// Reads the full contents of the file at `path`
	async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

	/// Checks whether a regular file exists at `path`
	async fn exists(&self, path: &Path) -> bool;
}

/// [`AssetFs`] backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

#[async_trait]
impl AssetFs for TokioFs {
	async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
		tokio::fs::read(path).await
	}

	async fn exists(&self, path: &Path) -> bool {
		tokio::fs::metadata(path)
			.await
			.map(|metadata| metadata.is_file())
			.unwrap_or(false)
	}
}

/// In-memory [`AssetFs`] that counts every access
///
/// # Example
///
/// ```rust
/// use reinhardt_cachify::fs::MemoryFs;
///
/// let fs = MemoryFs::new().with_file("/srv/static/app.js", "console.log(1);");
/// assert_eq!(fs.read_count(), 0);
/// assert_eq!(fs.exists_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryFs {
	files: RwLock<HashMap<PathBuf, Vec<u8>>>,
	reads: AtomicUsize,
	checks: AtomicUsize,
}

impl MemoryFs {
	/// Creates an empty filesystem
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a file using builder pattern
	pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
		self.insert(path, contents);
		self
	}

	/// Adds or replaces a file
	pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
		let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
		files.insert(path.into(), contents.into());
	}

	/// Number of `read` calls so far
	pub fn read_count(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	/// Number of `exists` calls so far
	pub fn exists_count(&self) -> usize {
		self.checks.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl AssetFs for MemoryFs {
	async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		let files = self.files.read().unwrap_or_else(|e| e.into_inner());
		files.get(path).cloned().ok_or_else(|| {
			io::Error::new(
				io::ErrorKind::NotFound,
				format!("{} not found", path.display()),
			)
		})
	}

	async fn exists(&self, path: &Path) -> bool {
		self.checks.fetch_add(1, Ordering::SeqCst);
		let files = self.files.read().unwrap_or_else(|e| e.into_inner());
		files.contains_key(path)
	}
}
