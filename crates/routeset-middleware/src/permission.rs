//! Permission-enforcing middleware.
//!
//! Routers declare view permission policies; this middleware is the
//! collaborator that enforces them before a request reaches its view. It
//! resolves the request path against the root router's tree, attributes the
//! match to the owning router through the namespace chain, and asks that
//! router's policy about the caller. Denials short-circuit with a 403.
//!
//! The middleware also guarantees downstream code finds an
//! [`AuthState`](routeset_http::AuthState) in the request extensions: when no
//! upstream layer stored one, the anonymous state is filled in.

use std::sync::Arc;

use async_trait::async_trait;
use routeset_http::{AuthState, Error, Middleware, Request, Response, Result, View};
use routeset_urls::resolve;
use routeset_viewsets::Viewset;

/// Enforces router-level view permissions for one mounted router tree.
///
/// Paths that do not resolve, or resolve to a match no router in the tree
/// owns, pass through untouched; enforcement is scoped to what the tree
/// claims. Object-level checks stay in the views, so the policy is consulted
/// without an object here.
pub struct PermissionMiddleware {
	root: Arc<Viewset>,
}

impl PermissionMiddleware {
	pub fn new(root: Arc<Viewset>) -> Self {
		Self { root }
	}
}

#[async_trait]
impl Middleware for PermissionMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn View>) -> Result<Response> {
		let auth = request
			.extensions
			.get::<AuthState>()
			.unwrap_or_else(AuthState::anonymous);
		request.extensions.insert(auth.clone());

		let tree = self
			.root
			.urls()
			.map_err(|err| Error::ImproperlyConfigured(err.to_string()))?;
		if let Ok(matched) = resolve(&tree, request.path()) {
			if let Some(owner) = self.root.resolve_owner(&matched.namespaces) {
				if !owner.has_view_permission(&auth, None) {
					tracing::debug!(
						path = request.path(),
						router = owner.def().name(),
						"view permission denied"
					);
					return Ok(Error::PermissionDenied(format!(
						"no view permission on {}",
						request.path()
					))
					.into_response());
				}
			}
		}
		next.dispatch(request).await
	}
}

#[cfg(test)]
mod tests {
	use hyper::{Method, StatusCode};
	use routeset_http::{FnView, MiddlewareChain};
	use routeset_viewsets::{PathDef, RouteDef, ViewPermission, ViewsetDef};
	use serde_json::Value as JsonValue;

	use super::*;

	struct RequireAuth;

	impl ViewPermission for RequireAuth {
		fn has_view_permission(&self, auth: &AuthState, _obj: Option<&JsonValue>) -> bool {
			auth.is_authenticated
		}
	}

	fn stub_view(body: &'static str) -> Arc<dyn View> {
		Arc::new(FnView::new(move |_request: Request| async move {
			Ok(Response::ok().with_body(body))
		}))
	}

	fn get(uri: &str) -> Request {
		Request::builder()
			.method(Method::GET)
			.uri(uri)
			.build()
			.unwrap()
	}

	fn guarded_root() -> Arc<Viewset> {
		let def = ViewsetDef::builder("SecureViewset")
			.app_name("secure")
			.permission(Arc::new(RequireAuth))
			.declare("report_path", PathDef::new("report/", stub_view("report")))
			.build()
			.unwrap();
		Arc::new(Viewset::new(&def).unwrap())
	}

	fn chain(root: &Arc<Viewset>) -> MiddlewareChain {
		MiddlewareChain::new(stub_view("passed"))
			.with_middleware(Arc::new(PermissionMiddleware::new(root.clone())))
	}

	#[tokio::test]
	async fn test_anonymous_caller_is_denied() {
		let root = guarded_root();
		let response = chain(&root).execute(get("/report/")).await.unwrap();
		assert_eq!(response.status, StatusCode::FORBIDDEN);
		let body = String::from_utf8_lossy(&response.body);
		assert!(body.contains("/report/"));
	}

	#[tokio::test]
	async fn test_authenticated_caller_passes() {
		let root = guarded_root();
		let request = get("/report/");
		request
			.extensions
			.insert(AuthState::authenticated(7, false, true));

		let response = chain(&root).execute(request).await.unwrap();
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(&response.body[..], b"passed");
	}

	#[tokio::test]
	async fn test_anonymous_state_is_stored_for_downstream() {
		let def = ViewsetDef::builder("OpenViewset")
			.app_name("open")
			.declare("home_path", PathDef::new("", stub_view("home")))
			.build()
			.unwrap();
		let root = Arc::new(Viewset::new(&def).unwrap());

		let reader = Arc::new(FnView::new(|request: Request| async move {
			let auth = request.extensions.get::<AuthState>();
			assert_eq!(auth, Some(AuthState::anonymous()));
			Ok(Response::ok())
		}));
		let chain = MiddlewareChain::new(reader)
			.with_middleware(Arc::new(PermissionMiddleware::new(root)));

		let response = chain.execute(get("/")).await.unwrap();
		assert!(response.is_success());
	}

	#[tokio::test]
	async fn test_unmatched_path_passes_through() {
		let root = guarded_root();
		let response = chain(&root).execute(get("/elsewhere/")).await.unwrap();
		assert_eq!(&response.body[..], b"passed");
	}

	#[tokio::test]
	async fn test_child_policy_guards_only_its_subtree() {
		let items = ViewsetDef::builder("ItemsViewset")
			.app_name("items")
			.permission(Arc::new(RequireAuth))
			.declare("detail_path", PathDef::new("{pk:int}/", stub_view("item")))
			.build()
			.unwrap();
		let shop = ViewsetDef::builder("ShopViewset")
			.app_name("shop")
			.declare("about_path", PathDef::new("about/", stub_view("about")))
			.declare("items", RouteDef::new("goods/", items))
			.build()
			.unwrap();
		let root = Arc::new(Viewset::new(&shop).unwrap());

		let open = chain(&root).execute(get("/about/")).await.unwrap();
		assert_eq!(open.status, StatusCode::OK);

		let blocked = chain(&root).execute(get("/goods/3/")).await.unwrap();
		assert_eq!(blocked.status, StatusCode::FORBIDDEN);
	}
}
