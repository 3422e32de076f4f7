//! URL primitives module.
//!
//! Path patterns with named converters, pattern trees and includes, forward
//! resolution, reverse lookup, the process-wide urlconf registry, and the
//! index-redirect view.
//!
//! # Examples
//!
//! ```
//! use routeset::urls::PathPattern;
//!
//! let pattern = PathPattern::new("articles/{pk:int}/").unwrap();
//! let params = pattern.matches("articles/7/").unwrap();
//! assert_eq!(params["pk"], "7");
//! ```

pub use routeset_urls::*;
