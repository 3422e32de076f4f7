//! # Routeset
//!
//! Declarative, class-based URL routing: ordered override-aware pattern
//! collection, nested routers with namespace propagation, automatic index
//! redirects, menu composition, and metadata-carrying resolution.
//!
//! Routers are described as immutable definitions (ordered tables of named
//! declarations gathered across base definitions with override and removal
//! semantics) and instantiated into live routers whose pattern trees,
//! namespaces, and reverse names follow from the declarations alone. The
//! crate is a facade: the implementation lives in the member crates, each
//! re-exported here both flat and as a module.
//!
//! ## Core pieces
//!
//! - [`ViewsetDef`]/[`Viewset`]: router blueprints and configured instances
//! - [`PathDef`]/[`RouteDef`]: pattern and nesting declarations
//! - [`resolve`](urls::resolve)/[`reverse`]: forward and reverse lookup
//! - [`application`]/[`site`]: composite presets with menus and index
//!   redirects
//! - [`PermissionMiddleware`]/[`ContextMiddleware`]/[`RouterView`]: the
//!   request pipeline around a mounted router
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use routeset::urls::{Reverser, resolve};
//! use routeset::{FnView, PathDef, Request, Response, RouteDef, Viewset, ViewsetDef};
//!
//! # fn main() -> routeset::viewsets::ConfigResult<()> {
//! let view = Arc::new(FnView::new(|_request: Request| async {
//!     Ok(Response::ok())
//! }));
//!
//! // Declare the routers.
//! let articles = ViewsetDef::builder("ArticlesViewset")
//!     .app_name("articles")
//!     .declare("detail_path", PathDef::new("{pk:int}/", view))
//!     .build()?;
//! let news = ViewsetDef::builder("NewsSite")
//!     .app_name("news")
//!     .declare("articles", RouteDef::new("articles/", articles))
//!     .build()?;
//!
//! // Instantiate, resolve, reverse.
//! let root = Viewset::new(&news)?;
//! let tree = root.urls()?;
//! let matched = resolve(&tree, "/articles/7/").unwrap();
//! assert_eq!(matched.view_name(), "news:articles:detail");
//!
//! let reverser = Reverser::from_tree(&tree);
//! let url = reverser
//!     .reverse("news:articles:detail", &[], &[("pk", "7")])
//!     .unwrap();
//! assert_eq!(url, "/articles/7/");
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod middleware;
pub mod urls;
pub mod viewsets;

// Re-export HTTP seam types
pub use routeset_http::{
	AuthState, Error, Extensions, FnView, Middleware, MiddlewareChain, Request, RequestBuilder,
	Response, Result, View,
};

// Re-export URL primitives
pub use routeset_urls::{
	IndexRedirectView, ParamSpec, PathPattern, PatternError, ResolveError, ResolvedMatch,
	ResolvedName, ReverseError, Reverser, UrlEntry, UrlInclude, UrlPattern, UrlTree, dispatch,
	include, menu_path, path, resolve,
};

// Re-export the global urlconf registry
pub use routeset_urls::urlconf::{
	clear_urlconf, get_urlconf, reverse, reverse_scoped, set_script_prefix, set_urlconf,
};

// Re-export the declarative router layer
pub use routeset_viewsets::{
	AllowAll, ConfigError, ConfigResult, ContextProvider, Declared, Kwargs, MenuEntry, MenuItem,
	Overrides, ParentLink, PathDef, Route, RouteDef, SubDef, Value, ViewFactory, ViewPermission,
	Viewset, ViewsetDef, ViewsetDefBuilder, application, compose_menu, site,
};

// Re-export the collaborator middlewares
pub use routeset_middleware::{ContextMiddleware, PermissionMiddleware, RouterContext, RouterView};

// Re-export StatusCode from hyper
pub use hyper::StatusCode;

// Re-export common external dependencies
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use tokio;

pub mod prelude {
	pub use crate::{
		AuthState, ContextMiddleware, Error, FnView, Middleware, MiddlewareChain, PathDef,
		PermissionMiddleware, Request, Response, Result, Route, RouteDef, RouterView, StatusCode,
		View, Viewset, ViewsetDef, application, site,
	};

	// Lookup entry points, including the process urlconf
	pub use crate::{clear_urlconf, dispatch, resolve, reverse, set_urlconf};

	// External
	pub use async_trait::async_trait;
	pub use serde::{Deserialize, Serialize};
}
