//! Cache busting middleware
//!
//! Strips the hash from legitimate cache-busted URLs before the static file
//! server sees them, exposes the template helpers to downstream handlers and
//! marks the served asset as cacheable for a year.

use crate::error::Result;
use crate::handler::{Handler, Middleware, Request, Response};
use crate::interceptor::{CACHE_CONTROL_VALUE, Interception, Interceptor};
use crate::tags::AssetTags;
use async_trait::async_trait;
use http::header::{CACHE_CONTROL, HeaderValue};
use std::sync::Arc;

/// Middleware placed in front of static file resolution
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_cachify::{Cachify, CachifyConfig};
/// use reinhardt_cachify::fs::MemoryFs;
/// use reinhardt_cachify::handler::{Handler, Middleware, Request, Response};
///
/// struct StaticFiles;
///
/// #[async_trait::async_trait]
/// impl Handler for StaticFiles {
///     async fn handle(&self, request: Request) -> reinhardt_cachify::Result<Response> {
///         Ok(Response::ok().with_body(request.path().to_string()))
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let fs = Arc::new(MemoryFs::new().with_file("/srv/static/app.js", "hello"));
/// let cachify = Cachify::with_fs(CachifyConfig::new("/srv/static"), fs).unwrap();
/// let middleware = cachify.middleware();
///
/// let request = Request::get("/5d41402abc4b2a76b9719d911017c592/app.js").unwrap();
/// let response = middleware.process(request, Arc::new(StaticFiles)).await.unwrap();
///
/// assert_eq!(response.body, "/app.js");
/// assert_eq!(response.headers["cache-control"], "public, max-age=31536000");
/// # });
/// ```
pub struct CachifyMiddleware {
	interceptor: Interceptor,
	tags: AssetTags,
}

impl CachifyMiddleware {
	/// Creates the middleware from its two collaborators
	pub fn new(interceptor: Interceptor, tags: AssetTags) -> Self {
		Self { interceptor, tags }
	}

	/// Template helpers inserted into each request
	pub fn tags(&self) -> &AssetTags {
		&self.tags
	}
}

#[async_trait]
impl Middleware for CachifyMiddleware {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let outcome = self.interceptor.inspect(request.path()).await;
		if let Interception::Rewritten { true_path } = &outcome {
			request.set_path(true_path)?;
		}

		request.extensions.insert(self.tags.clone());

		let mut response = next.handle(request).await?;

		// Overrides whatever the file server chose for the unhashed path
		if outcome.is_rewritten() {
			response =
				response.with_header(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
		}

		Ok(response)
	}
}
