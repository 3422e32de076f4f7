//! Routing-aware middlewares module.
//!
//! Permission enforcement, router context injection, and the terminal
//! [`RouterView`](routeset_middleware::RouterView) that dispatches into a
//! router's pattern tree.

pub use routeset_middleware::*;
