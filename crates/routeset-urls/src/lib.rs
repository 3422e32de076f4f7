//! URL primitives for the routeset routing library.
//!
//! This crate is the resolver side of the system: compiled path patterns
//! with named converters, ordered pattern lists nested through includes,
//! forward resolution that threads router metadata into every match, reverse
//! lookup from namespaced names, the process-wide urlconf registry, and the
//! index-redirect view composite routers mount at their bare prefix.
//!
//! The declarative layer that builds these trees lives in
//! `routeset-viewsets`; nothing here knows about routers, only about the
//! pattern lists they produce.
//!
//! # Examples
//!
//! ```
//! use routeset_urls::{path, resolve, UrlTree};
//! use routeset_http::{FnView, Request, Response};
//! use std::sync::Arc;
//!
//! let view = Arc::new(FnView::new(|_request: Request| async {
//!     Ok(Response::ok())
//! }));
//! let tree = UrlTree::new(vec![
//!     path("articles/{pk:int}/", view, "detail").unwrap().into(),
//! ])
//! .with_namespace("news");
//!
//! let matched = resolve(&tree, "/articles/7/").unwrap();
//! assert_eq!(matched.view_name(), "news:detail");
//! assert_eq!(matched.kwargs.get("pk"), Some(&"7".to_string()));
//! ```

pub mod converters;
pub mod entry;
pub mod index;
pub mod pattern;
pub mod resolve;
pub mod reverse;
pub mod urlconf;

pub use converters::{Converter, get_converter};
pub use entry::{UrlEntry, UrlInclude, UrlPattern, UrlTree, include, menu_path, path};
pub use index::{IndexRedirectView, find_index_target};
pub use pattern::{ParamSpec, PathPattern, PatternError, PatternResult};
pub use resolve::{ResolveError, ResolveResult, ResolvedMatch, ResolvedName, dispatch, resolve};
pub use reverse::{ReverseError, ReverseResult, Reverser};
pub use urlconf::{
	UrlConf, clear_urlconf, get_script_prefix, get_urlconf, reverse as reverse_url,
	reverse_scoped, set_script_prefix, set_urlconf,
};
