//! Declarative routers module.
//!
//! Router definitions and their builder, instantiated routers, menu
//! composition, and the [`application`](routeset_viewsets::application)/
//! [`site`](routeset_viewsets::site) composite presets.
//!
//! # Examples
//!
//! ```
//! use routeset::viewsets::ViewsetDef;
//!
//! let def = ViewsetDef::builder("ArchiveViewset")
//!     .app_name("archive")
//!     .build()
//!     .unwrap();
//! assert_eq!(def.mount_slug(), "archive");
//! ```

pub use routeset_viewsets::*;
