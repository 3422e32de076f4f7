//! Router context injection.
//!
//! Routers can declare a context provider; this middleware calls it for the
//! router owning the matched pattern and stores the result in the request
//! extensions as a [`RouterContext`], where views and later middleware pick
//! it up. Requests whose path does not resolve, or whose match no router in
//! the tree owns, carry no context.

use std::sync::Arc;

use async_trait::async_trait;
use routeset_http::{Error, Middleware, Request, Response, Result, View};
use routeset_urls::resolve;
use routeset_viewsets::Viewset;
use serde_json::{Map, Value as JsonValue};

/// Template context contributed by the router owning the matched pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterContext {
	map: Map<String, JsonValue>,
}

impl RouterContext {
	pub fn new(map: Map<String, JsonValue>) -> Self {
		Self { map }
	}

	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.map.get(key)
	}

	pub fn as_map(&self) -> &Map<String, JsonValue> {
		&self.map
	}

	pub fn into_map(self) -> Map<String, JsonValue> {
		self.map
	}
}

/// Stores the owning router's context data on each matched request.
///
/// The context is present, possibly empty, whenever a router in the tree
/// owns the match; a router without a declared provider contributes an empty
/// map.
pub struct ContextMiddleware {
	root: Arc<Viewset>,
}

impl ContextMiddleware {
	pub fn new(root: Arc<Viewset>) -> Self {
		Self { root }
	}
}

#[async_trait]
impl Middleware for ContextMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn View>) -> Result<Response> {
		let tree = self
			.root
			.urls()
			.map_err(|err| Error::ImproperlyConfigured(err.to_string()))?;
		if let Ok(matched) = resolve(&tree, request.path()) {
			if let Some(owner) = self.root.resolve_owner(&matched.namespaces) {
				let context = owner.get_context_data(&request);
				request.extensions.insert(RouterContext::new(context));
			}
		}
		next.dispatch(request).await
	}
}

#[cfg(test)]
mod tests {
	use hyper::Method;
	use routeset_http::{FnView, MiddlewareChain};
	use routeset_viewsets::{ContextProvider, PathDef, ViewsetDef};

	use super::*;

	struct SectionProvider;

	impl ContextProvider for SectionProvider {
		fn get_context_data(
			&self,
			viewset: &Viewset,
			request: &Request,
		) -> Map<String, JsonValue> {
			let mut map = Map::new();
			map.insert("section".to_string(), JsonValue::from(viewset.title()));
			if let Some(q) = request.query_params().get("q") {
				map.insert("query".to_string(), JsonValue::from(q.as_str()));
			}
			map
		}
	}

	fn stub_view() -> Arc<dyn View> {
		Arc::new(FnView::new(|_request: Request| async { Ok(Response::ok()) }))
	}

	fn get(uri: &str) -> Request {
		Request::builder()
			.method(Method::GET)
			.uri(uri)
			.build()
			.unwrap()
	}

	fn root_with_provider() -> Arc<Viewset> {
		let def = ViewsetDef::builder("ReportsViewset")
			.app_name("reports")
			.title("Reports")
			.context(Arc::new(SectionProvider))
			.declare("list_path", PathDef::new("", stub_view()))
			.build()
			.unwrap();
		Arc::new(Viewset::new(&def).unwrap())
	}

	#[tokio::test]
	async fn test_provider_context_reaches_the_view() {
		let root = root_with_provider();
		let echo = Arc::new(FnView::new(|request: Request| async move {
			let context = request.extensions.get::<RouterContext>().unwrap();
			let section = context.get("section").unwrap().as_str().unwrap();
			Ok(Response::ok().with_body(section.to_string()))
		}));
		let chain =
			MiddlewareChain::new(echo).with_middleware(Arc::new(ContextMiddleware::new(root)));

		let response = chain.execute(get("/")).await.unwrap();
		assert_eq!(&response.body[..], b"Reports");
	}

	#[tokio::test]
	async fn test_provider_sees_the_request() {
		let root = root_with_provider();
		let echo = Arc::new(FnView::new(|request: Request| async move {
			let context = request.extensions.get::<RouterContext>().unwrap();
			let query = context.get("query").unwrap().as_str().unwrap();
			Ok(Response::ok().with_body(query.to_string()))
		}));
		let chain =
			MiddlewareChain::new(echo).with_middleware(Arc::new(ContextMiddleware::new(root)));

		let response = chain.execute(get("/?q=alpha")).await.unwrap();
		assert_eq!(&response.body[..], b"alpha");
	}

	#[tokio::test]
	async fn test_router_without_provider_contributes_empty_context() {
		let def = ViewsetDef::builder("PlainViewset")
			.app_name("plain")
			.declare("home_path", PathDef::new("", stub_view()))
			.build()
			.unwrap();
		let root = Arc::new(Viewset::new(&def).unwrap());

		let probe = Arc::new(FnView::new(|request: Request| async move {
			let context = request.extensions.get::<RouterContext>().unwrap();
			assert!(context.as_map().is_empty());
			Ok(Response::ok())
		}));
		let chain =
			MiddlewareChain::new(probe).with_middleware(Arc::new(ContextMiddleware::new(root)));

		assert!(chain.execute(get("/")).await.unwrap().is_success());
	}

	#[tokio::test]
	async fn test_unmatched_path_carries_no_context() {
		let root = root_with_provider();
		let probe = Arc::new(FnView::new(|request: Request| async move {
			assert_eq!(request.extensions.get::<RouterContext>(), None);
			Ok(Response::ok())
		}));
		let chain =
			MiddlewareChain::new(probe).with_middleware(Arc::new(ContextMiddleware::new(root)));

		assert!(chain.execute(get("/missing/")).await.unwrap().is_success());
	}
}
