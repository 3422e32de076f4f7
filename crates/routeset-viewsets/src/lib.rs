//! Declarative class-based routers for the routeset routing library.
//!
//! This crate is the declarative side of the system. A [`ViewsetDef`] is a
//! router blueprint: an ordered table of named declarations collected across
//! its bases with override and removal semantics, plus capability flags and
//! policy hooks. A [`Viewset`] is one configured instance of a definition:
//! constructor overrides applied, children instantiated fresh, pattern tree
//! built lazily and memoized. On top of instances sit namespaced reverse
//! lookup, menu composition, permission and context hooks, and the
//! [`application`]/[`site`] composite presets.
//!
//! Pattern trees produced here are plain `routeset-urls` values; everything
//! request-shaped (matching, dispatch, redirects) happens in that crate.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use routeset_http::{FnView, Request, Response};
//! use routeset_urls::resolve;
//! use routeset_viewsets::{PathDef, RouteDef, Viewset, ViewsetDef};
//!
//! # fn main() -> routeset_viewsets::ConfigResult<()> {
//! let view = Arc::new(FnView::new(|_request: Request| async {
//!     Ok(Response::ok())
//! }));
//!
//! let items = ViewsetDef::builder("ItemsViewset")
//!     .app_name("items")
//!     .declare("detail_path", PathDef::new("{pk:int}/", view))
//!     .build()?;
//! let shop = ViewsetDef::builder("ShopViewset")
//!     .app_name("shop")
//!     .declare("items", RouteDef::new("goods/", items))
//!     .build()?;
//!
//! let root = Viewset::new(&shop)?;
//! let urls = root.urls()?;
//! let matched = resolve(&urls, "/goods/5/").unwrap();
//! assert_eq!(matched.view_name(), "shop:items:detail");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod collector;
pub mod declaration;
pub mod error;
pub mod menu;
pub mod route;
pub mod site;
pub mod value;
pub mod viewset;

pub use builder::{BUILT_IN_KEYS, SubDef, ViewsetDef, ViewsetDefBuilder};
pub use collector::{PatternSlot, is_pattern_name};
pub use declaration::{
	AllowAll, ContextProvider, Declared, Overrides, PathDef, RouteDef, ViewFactory, ViewPermission,
	ViewSpec,
};
pub use error::{ConfigError, ConfigResult};
pub use menu::{MenuEntry, MenuItem, compose_menu};
pub use route::Route;
pub use site::{application, site};
pub use value::{Kwargs, Value, filter_kwargs};
pub use viewset::{ParentLink, Viewset};
