//! View and middleware traits.
//!
//! A [`View`] is the unit the routing layer mounts: it receives a request and
//! produces a response or an error. [`Middleware`] wraps views with
//! cross-cutting behavior; [`MiddlewareChain`] composes several middlewares
//! around a terminal view.
//!
//! ```
//! use routeset_http::{Request, Response, View};
//! use async_trait::async_trait;
//!
//! struct HealthView;
//!
//! #[async_trait]
//! impl View for HealthView {
//!     async fn dispatch(&self, _request: Request) -> routeset_http::Result<Response> {
//!         Ok(Response::ok().with_body("ok"))
//!     }
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::request::Request;
use crate::response::Response;

/// An endpoint the router can mount.
#[async_trait]
pub trait View: Send + Sync {
	/// Handles a request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error when the request cannot be served; dispatch maps it
	/// to a status via [`crate::Error::status`].
	async fn dispatch(&self, request: Request) -> Result<Response>;
}

/// Allows `Arc<dyn View>` wherever a view is expected.
#[async_trait]
impl<T: View + ?Sized> View for Arc<T> {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		(**self).dispatch(request).await
	}
}

/// Adapter turning an async function into a [`View`].
///
/// # Examples
///
/// ```
/// use routeset_http::{Error, FnView, Request, Response};
///
/// let view = FnView::new(|_request: Request| async {
///     Ok::<_, Error>(Response::ok().with_body("from a function"))
/// });
/// ```
pub struct FnView<F> {
	func: F,
}

impl<F> FnView<F> {
	pub fn new(func: F) -> Self {
		Self { func }
	}
}

#[async_trait]
impl<F, Fut> View for FnView<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send,
{
	async fn dispatch(&self, request: Request) -> Result<Response> {
		(self.func)(request).await
	}
}

/// Request/response interceptor wrapped around a view.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request, deciding whether and how to call `next`.
	///
	/// # Errors
	///
	/// Returns an error if this middleware or the wrapped view fails.
	async fn process(&self, request: Request, next: Arc<dyn View>) -> Result<Response>;

	/// Whether this middleware applies to the given request. Returning
	/// `false` skips it for this request only.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

struct MiddlewareView {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn View>,
}

#[async_trait]
impl View for MiddlewareView {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

/// Composes middlewares around a terminal view, outermost first.
///
/// # Examples
///
/// ```
/// use routeset_http::{FnView, MiddlewareChain, Request, Response};
/// use std::sync::Arc;
///
/// let view = Arc::new(FnView::new(|_request: Request| async {
///     Ok(Response::ok())
/// }));
/// let chain = MiddlewareChain::new(view);
/// ```
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	view: Arc<dyn View>,
}

impl MiddlewareChain {
	pub fn new(view: Arc<dyn View>) -> Self {
		Self {
			middlewares: Vec::new(),
			view,
		}
	}

	/// Adds a middleware. Middlewares run in the order they were added.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Runs the request through every applicable middleware and the view.
	pub async fn execute(&self, request: Request) -> Result<Response> {
		let mut next: Arc<dyn View> = self.view.clone();
		for middleware in self.middlewares.iter().rev() {
			if !middleware.should_continue(&request) {
				continue;
			}
			next = Arc::new(MiddlewareView {
				middleware: middleware.clone(),
				next,
			});
		}
		next.dispatch(request).await
	}
}

#[async_trait]
impl View for MiddlewareChain {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		self.execute(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::Method;

	fn get(uri: &str) -> Request {
		Request::builder()
			.method(Method::GET)
			.uri(uri)
			.build()
			.unwrap()
	}

	struct TagMiddleware {
		tag: &'static str,
	}

	#[async_trait]
	impl Middleware for TagMiddleware {
		async fn process(&self, request: Request, next: Arc<dyn View>) -> Result<Response> {
			let response = next.dispatch(request).await?;
			let mut body = self.tag.as_bytes().to_vec();
			body.extend_from_slice(&response.body);
			Ok(response.with_body(body))
		}
	}

	struct SkippedMiddleware;

	#[async_trait]
	impl Middleware for SkippedMiddleware {
		async fn process(&self, _request: Request, _next: Arc<dyn View>) -> Result<Response> {
			Ok(Response::forbidden())
		}

		fn should_continue(&self, request: &Request) -> bool {
			!request.path().starts_with("/public/")
		}
	}

	#[tokio::test]
	async fn test_middlewares_run_in_registration_order() {
		let view = Arc::new(FnView::new(|_request: Request| async {
			Ok(Response::ok().with_body("view"))
		}));
		let chain = MiddlewareChain::new(view)
			.with_middleware(Arc::new(TagMiddleware { tag: "outer-" }))
			.with_middleware(Arc::new(TagMiddleware { tag: "inner-" }));

		let response = chain.execute(get("/")).await.unwrap();
		assert_eq!(&response.body[..], b"outer-inner-view");
	}

	#[tokio::test]
	async fn test_should_continue_skips_per_request() {
		let view = Arc::new(FnView::new(|_request: Request| async {
			Ok(Response::ok())
		}));
		let chain = MiddlewareChain::new(view).with_middleware(Arc::new(SkippedMiddleware));

		let blocked = chain.execute(get("/private/")).await.unwrap();
		assert_eq!(blocked.status, hyper::StatusCode::FORBIDDEN);

		let allowed = chain.execute(get("/public/page/")).await.unwrap();
		assert!(allowed.is_success());
	}
}
