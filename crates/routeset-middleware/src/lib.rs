//! Routing-aware middlewares for the routeset routing library.
//!
//! The routing core exposes two collaborator hooks on every router:
//! `has_view_permission` and `get_context_data`. This crate supplies the
//! middlewares that consume them ([`PermissionMiddleware`] turns policy
//! denials into 403 responses, [`ContextMiddleware`] stores the owning
//! router's context in the request extensions) plus [`RouterView`], the
//! terminal view that dispatches a request into a router's pattern tree.
//!
//! A typical pipeline wraps a router end to end:
//!
//! ```
//! use std::sync::Arc;
//!
//! use routeset_http::MiddlewareChain;
//! use routeset_middleware::{ContextMiddleware, PermissionMiddleware, RouterView};
//! use routeset_viewsets::{Viewset, ViewsetDef};
//!
//! # fn main() -> routeset_viewsets::ConfigResult<()> {
//! let def = ViewsetDef::builder("SiteViewset").app_name("site").build()?;
//! let root = Arc::new(Viewset::new(&def)?);
//!
//! let pipeline = MiddlewareChain::new(Arc::new(RouterView::new(root.clone())))
//!     .with_middleware(Arc::new(PermissionMiddleware::new(root.clone())))
//!     .with_middleware(Arc::new(ContextMiddleware::new(root)));
//! # let _ = pipeline;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod dispatch;
pub mod permission;

// Re-export the middleware seam from routeset-http.
pub use routeset_http::{Middleware, MiddlewareChain, View};

pub use context::{ContextMiddleware, RouterContext};
pub use dispatch::RouterView;
pub use permission::PermissionMiddleware;
