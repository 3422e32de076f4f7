//! HTTP seam module.
//!
//! Request/response types, the [`View`](routeset_http::View) and
//! [`Middleware`](routeset_http::Middleware) traits, per-request
//! [`Extensions`](routeset_http::Extensions), and the shared error enum.
//!
//! # Examples
//!
//! ```
//! use routeset::http::Request;
//!
//! let request = Request::builder().uri("/items/?page=2").build().unwrap();
//! assert_eq!(request.path(), "/items/");
//! ```

pub use routeset_http::*;
