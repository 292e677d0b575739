//! Specialized test fixtures for reinhardt-cachify
//!
//! Asset roots live in temporary directories; `FileServer` plays the
//! downstream static file server.

// Not every fixture is used by every test file.
#![allow(dead_code)]

use async_trait::async_trait;
use reinhardt_cachify::handler::{Handler, Request, Response};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir as TempDirType;

/// Wrapper for tempfile TempDir exposing the asset root
pub struct TempDir {
	inner: TempDirType,
}

impl TempDir {
	fn new(temp_dir: TempDirType) -> Self {
		Self { inner: temp_dir }
	}

	pub fn path(&self) -> &Path {
		self.inner.path()
	}

	/// Asset root inside the temporary directory
	pub fn static_root(&self) -> PathBuf {
		self.inner.path().join("static")
	}
}

/// Creates a temporary asset root with sample files
///
/// Layout under `static/`:
/// - `app.js`, `app.css` (production bundles)
/// - `js/a.js`, `js/b.js`, `css/reset.css` (development sources)
pub fn static_dir() -> TempDir {
	let temp_dir = TempDirType::new().unwrap();
	let static_path = temp_dir.path().join("static");
	fs::create_dir_all(static_path.join("js")).unwrap();
	fs::create_dir_all(static_path.join("css")).unwrap();

	fs::write(static_path.join("app.js"), "console.log('bundle');").unwrap();
	fs::write(static_path.join("app.css"), "body { color: red; }").unwrap();
	fs::write(static_path.join("js/a.js"), "console.log('a');").unwrap();
	fs::write(static_path.join("js/b.js"), "console.log('b');").unwrap();
	fs::write(static_path.join("css/reset.css"), "* { margin: 0; }").unwrap();

	TempDir::new(temp_dir)
}

/// MD5 hex digest computed independently of the crate
pub fn md5_hex(content: &[u8]) -> String {
	use md5::{Digest, Md5};
	hex::encode(Md5::digest(content))
}

/// Static file server that records the paths it was asked for
pub struct FileServer {
	root: PathBuf,
	pub requested: Mutex<Vec<String>>,
}

impl FileServer {
	pub fn new(root: PathBuf) -> Self {
		Self {
			root,
			requested: Mutex::new(Vec::new()),
		}
	}
}

#[async_trait]
impl Handler for FileServer {
	async fn handle(&self, request: Request) -> reinhardt_cachify::Result<Response> {
		let path = request.path().to_string();
		self.requested.lock().unwrap().push(path.clone());

		match tokio::fs::read(self.root.join(path.trim_start_matches('/'))).await {
			Ok(content) => Ok(Response::ok().with_body(content)),
			Err(_) => Ok(Response::not_found()),
		}
	}
}
