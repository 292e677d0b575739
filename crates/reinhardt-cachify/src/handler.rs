//! Request, response and middleware abstractions.
//!
//! The interceptor sits in front of a static file server it does not own.
//! These types describe just enough of that boundary for the middleware to
//! rewrite the request before delegating and decorate the response after.
//!
//! ## Handler
//!
//! ```rust
//! use reinhardt_cachify::handler::{Handler, Request, Response};
//! use async_trait::async_trait;
//!
//! struct StaticFiles;
//!
//! #[async_trait]
//! impl Handler for StaticFiles {
//!     async fn handle(&self, request: Request) -> reinhardt_cachify::Result<Response> {
//!         Ok(Response::ok().with_body(request.path().to_string()))
//!     }
//! }
//! ```

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Extensions, HeaderMap, Method, StatusCode, Uri};
use std::sync::Arc;

/// Incoming HTTP request
#[derive(Debug)]
pub struct Request {
	/// HTTP method
	pub method: Method,
	/// Request target; rewritten in place by the interceptor
	pub uri: Uri,
	/// Request headers
	pub headers: HeaderMap,
	/// Request body
	pub body: Bytes,
	/// Values attached by middleware for downstream handlers
	pub extensions: Extensions,
}

impl Request {
	/// Creates a request with empty headers and body
	pub fn new(method: Method, uri: Uri) -> Self {
		Self {
			method,
			uri,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			extensions: Extensions::new(),
		}
	}

	/// Creates a GET request for `uri`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_cachify::handler::Request;
	///
	/// let request = Request::get("/js/app.js?v=1").unwrap();
	/// assert_eq!(request.path(), "/js/app.js");
	/// ```
	pub fn get(uri: &str) -> Result<Self> {
		Ok(Self::new(Method::GET, uri.parse()?))
	}

	/// Request path without the query string
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Replaces the request path, keeping scheme, authority and query
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_cachify::handler::Request;
	///
	/// let mut request = Request::get("/0123456789abcdef0123456789abcdef/app.js?v=1").unwrap();
	/// request.set_path("/app.js").unwrap();
	/// assert_eq!(request.uri.to_string(), "/app.js?v=1");
	/// ```
	pub fn set_path(&mut self, path: &str) -> Result<()> {
		let path_and_query = match self.uri.query() {
			Some(query) => format!("{path}?{query}"),
			None => path.to_string(),
		};

		let rewritten = match (self.uri.scheme_str(), self.uri.authority()) {
			(Some(scheme), Some(authority)) => format!("{scheme}://{authority}{path_and_query}"),
			_ => path_and_query,
		};

		self.uri = rewritten.parse()?;
		Ok(())
	}
}

/// HTTP response
#[derive(Debug)]
pub struct Response {
	/// Status code
	pub status: StatusCode,
	/// Response headers
	pub headers: HeaderMap,
	/// Response body
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 404 Not Found status
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// Set the response body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header to the response
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}
}

/// Handler trait for processing requests.
///
/// The static file server that ultimately serves the asset implements this.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
///
/// Implementations must call `next` exactly once to continue the chain.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request through this middleware.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;
}

/// Middleware chain - composes multiple middleware into a single handler.
///
/// Middleware runs in the order it was added.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Creates a new middleware chain with the given handler.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware to the chain using builder pattern.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		let mut current_handler = self.handler.clone();

		for middleware in self.middlewares.iter().rev() {
			current_handler = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current_handler,
			});
		}

		current_handler.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct EchoPathHandler;

	#[async_trait]
	impl Handler for EchoPathHandler {
		async fn handle(&self, request: Request) -> Result<Response> {
			Ok(Response::ok().with_body(request.path().to_string()))
		}
	}

	struct PrefixMiddleware {
		prefix: &'static str,
	}

	#[async_trait]
	impl Middleware for PrefixMiddleware {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let response = next.handle(request).await?;
			let body = String::from_utf8(response.body.to_vec()).unwrap_or_default();
			Ok(Response::ok().with_body(format!("{}{}", self.prefix, body)))
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_chain_without_middleware() {
		let chain = MiddlewareChain::new(Arc::new(EchoPathHandler));
		let response = chain.handle(Request::get("/a.js").unwrap()).await.unwrap();
		assert_eq!(response.body, Bytes::from("/a.js"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_chain_runs_middleware_in_order() {
		let chain = MiddlewareChain::new(Arc::new(EchoPathHandler))
			.with_middleware(Arc::new(PrefixMiddleware { prefix: "outer:" }))
			.with_middleware(Arc::new(PrefixMiddleware { prefix: "inner:" }));

		let response = chain.handle(Request::get("/a.js").unwrap()).await.unwrap();
		assert_eq!(response.body, Bytes::from("outer:inner:/a.js"));
	}

	#[rstest]
	#[case("/old.js", "/new.js", "/new.js")]
	#[case("/old.js?v=2", "/new.js", "/new.js?v=2")]
	#[case("http://example.com/old.js?v=2", "/new.js", "http://example.com/new.js?v=2")]
	fn test_set_path(#[case] uri: &str, #[case] path: &str, #[case] expected: &str) {
		let mut request = Request::get(uri).unwrap();
		request.set_path(path).unwrap();
		assert_eq!(request.uri.to_string(), expected);
	}
}
