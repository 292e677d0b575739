//! # Reinhardt Cachify
//!
//! Content-hash cache busting for static assets in the Reinhardt web framework.
//!
//! Asset URLs rendered into pages get the MD5 digest of the file spliced into
//! their path, so browsers can cache them for a year and still pick up a new
//! version right after a deploy. Incoming requests for such URLs have the hash
//! stripped before they reach the static file server.
//!
//! ## Features
//!
//! - **URL Hashing**: `/js/app.js` becomes `/<md5>/js/app.js`, external URLs are left alone
//! - **Hash Cache**: each asset is read and hashed at most once per process
//! - **Bundles**: one minified bundle in production, individual sources in development
//! - **Request Interception**: hash-prefixed requests are rewritten and marked cacheable
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reinhardt_cachify::{Cachify, CachifyConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CachifyConfig::new("static")
//!         .with_production(true)
//!         .with_js_bundle("/js/app.min.js", vec!["/js/a.js".to_string(), "/js/b.js".to_string()]);
//!
//!     let cachify = Cachify::new(config)?;
//!     cachify.preload().await;
//!
//!     // Install before static file resolution
//!     // chain.with_middleware(cachify.middleware());
//!
//!     // In a view
//!     let tags = cachify.tags();
//!     let markup = tags.cachify_js("/js/app.min.js").await;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`config`] - Configuration and bundle definitions
//! - [`cache`] - Existence and content-hash cache
//! - [`fs`] - Filesystem access used for hashing and existence checks
//! - [`path`] - Asset path classification and hash decoration
//! - [`hasher`] - Hash-decorated URL generation
//! - [`tags`] - Script and stylesheet tag generation
//! - [`interceptor`] - Hash-prefixed request detection
//! - [`middleware`] - HTTP middleware implementation
//! - [`handler`] - Request, response and middleware abstractions
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod cache;
mod cachify;
pub mod config;
pub mod error;
pub mod fs;
pub mod handler;
pub mod hasher;
pub mod interceptor;
pub mod middleware;
pub mod path;
pub mod tags;

// Re-export main types
pub use cachify::Cachify;
pub use config::CachifyConfig;
pub use error::{CachifyError, Result};
pub use interceptor::{CACHE_CONTROL_VALUE, Interception};
pub use middleware::CachifyMiddleware;
pub use tags::{AssetFamily, AssetTags};
