//! Terminal view adapter for mounted routers.

use std::sync::Arc;

use async_trait::async_trait;
use routeset_http::{Error, Request, Response, Result, View};
use routeset_viewsets::Viewset;

/// Adapts a router instance to the [`View`] trait.
///
/// `RouterView` is the terminal element of a middleware chain: it resolves
/// the request against the router's pattern tree, injects captured path
/// parameters, and dispatches to the matched view. Wrapping it in a
/// [`MiddlewareChain`](routeset_http::MiddlewareChain) with the permission
/// and context middlewares gives the full request pipeline this crate
/// exists for.
pub struct RouterView {
	root: Arc<Viewset>,
}

impl RouterView {
	pub fn new(root: Arc<Viewset>) -> Self {
		Self { root }
	}

	pub fn viewset(&self) -> &Arc<Viewset> {
		&self.root
	}
}

#[async_trait]
impl View for RouterView {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		let tree = self
			.root
			.urls()
			.map_err(|err| Error::ImproperlyConfigured(err.to_string()))?;
		routeset_urls::dispatch(&tree, request).await
	}
}

#[cfg(test)]
mod tests {
	use hyper::{Method, StatusCode};
	use routeset_http::{AuthState, FnView, MiddlewareChain};
	use routeset_viewsets::{ContextProvider, PathDef, ViewPermission, ViewsetDef};
	use serde_json::{Map, Value as JsonValue};

	use super::*;
	use crate::context::{ContextMiddleware, RouterContext};
	use crate::permission::PermissionMiddleware;

	fn get(uri: &str) -> Request {
		Request::builder()
			.method(Method::GET)
			.uri(uri)
			.build()
			.unwrap()
	}

	#[tokio::test]
	async fn test_dispatches_to_the_matched_view() {
		let echo = Arc::new(FnView::new(|request: Request| async move {
			let pk = request.path_param("pk").unwrap_or("?").to_string();
			Ok(Response::ok().with_body(pk))
		}));
		let def = ViewsetDef::builder("ItemsViewset")
			.app_name("items")
			.declare("detail_path", PathDef::new("{pk:int}/", echo))
			.build()
			.unwrap();
		let router = RouterView::new(Arc::new(Viewset::new(&def).unwrap()));

		let response = router.dispatch(get("/41/")).await.unwrap();
		assert_eq!(&response.body[..], b"41");
	}

	#[tokio::test]
	async fn test_miss_is_not_found() {
		let def = ViewsetDef::builder("EmptyViewset").build().unwrap();
		let router = RouterView::new(Arc::new(Viewset::new(&def).unwrap()));

		let err = router.dispatch(get("/anything/")).await.unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}

	struct AdminsOnly;

	impl ViewPermission for AdminsOnly {
		fn has_view_permission(&self, auth: &AuthState, _obj: Option<&JsonValue>) -> bool {
			auth.is_admin
		}
	}

	struct TitleContext;

	impl ContextProvider for TitleContext {
		fn get_context_data(
			&self,
			viewset: &Viewset,
			_request: &Request,
		) -> Map<String, JsonValue> {
			let mut map = Map::new();
			map.insert("title".to_string(), JsonValue::from(viewset.title()));
			map
		}
	}

	#[tokio::test]
	async fn test_full_pipeline_enforces_and_injects() {
		let page = Arc::new(FnView::new(|request: Request| async move {
			let context = request.extensions.get::<RouterContext>().unwrap();
			let title = context.get("title").unwrap().as_str().unwrap();
			Ok(Response::ok().with_body(title.to_string()))
		}));
		let def = ViewsetDef::builder("AdminViewset")
			.app_name("admin")
			.title("Administration")
			.permission(Arc::new(AdminsOnly))
			.context(Arc::new(TitleContext))
			.declare("home_path", PathDef::new("", page))
			.build()
			.unwrap();
		let root = Arc::new(Viewset::new(&def).unwrap());

		let pipeline = MiddlewareChain::new(Arc::new(RouterView::new(root.clone())))
			.with_middleware(Arc::new(PermissionMiddleware::new(root.clone())))
			.with_middleware(Arc::new(ContextMiddleware::new(root)));

		let blocked = pipeline.execute(get("/")).await.unwrap();
		assert_eq!(blocked.status, StatusCode::FORBIDDEN);

		let request = get("/");
		request
			.extensions
			.insert(AuthState::authenticated(1, true, true));
		let allowed = pipeline.execute(request).await.unwrap();
		assert_eq!(&allowed.body[..], b"Administration");
	}
}
