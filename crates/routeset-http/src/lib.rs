//! HTTP seam for the routeset routing library.
//!
//! The routing core composes and resolves URL trees; everything it needs from
//! an HTTP layer lives here: a [`Request`]/[`Response`] pair built on hyper's
//! types, the async [`View`] trait that routed endpoints implement, the
//! [`Middleware`] trait plus [`MiddlewareChain`] for cross-cutting concerns,
//! a type-safe [`Extensions`] store for per-request data, and the
//! [`AuthState`] consumed by permission checks.
//!
//! Nothing in this crate opens sockets. It is the in-process surface routed
//! views are written against.

pub mod auth;
pub mod error;
pub mod extensions;
pub mod handler;
pub mod request;
pub mod response;

pub use auth::AuthState;
pub use error::{Error, Result};
pub use extensions::Extensions;
pub use handler::{FnView, Middleware, MiddlewareChain, View};
pub use request::{Request, RequestBuilder};
pub use response::Response;
