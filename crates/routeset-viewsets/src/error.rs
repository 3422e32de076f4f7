//! Configuration errors.
//!
//! Everything here is a developer-facing contract violation surfaced at
//! definition or construction time, never during normal request handling.
//! Warnings (parent re-assignment, `parent_namespace` on a parented router)
//! are logged through `tracing` instead and do not abort anything.

use routeset_urls::PatternError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// An override key that names nothing on the definition. Rejected rather
	/// than ignored so per-instance typos fail at construction.
	#[error("Unknown override {key:?} for router {router:?}")]
	UnknownOverride { router: String, key: String },

	/// Override keys starting with `_` are internal and never settable.
	#[error("Override {key:?} for router {router:?} is private and cannot be set")]
	PrivateOverride { router: String, key: String },

	/// An override value that does not fit the declared channel: pattern
	/// slots take paths or routes, attributes take plain values.
	#[error("Override {key:?} for router {router:?} has the wrong kind for its declaration")]
	InvalidOverride { router: String, key: String },

	#[error("Pattern {name:?} on router {router:?} does not parse")]
	InvalidPattern {
		router: String,
		name: String,
		#[source]
		source: PatternError,
	},

	#[error("Route prefix for {name:?} on router {router:?} does not parse")]
	InvalidPrefix {
		router: String,
		name: String,
		#[source]
		source: PatternError,
	},

	/// The base list admits no consistent linearization, for example the
	/// same definition listed twice or two bases in contradictory order.
	#[error("Base list of router {router:?} cannot be linearized; reorder or deduplicate the bases")]
	LinearizationConflict { router: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unknown_override_names_router_and_key() {
		let error = ConfigError::UnknownOverride {
			router: "ShopViewset".to_string(),
			key: "basename".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"Unknown override \"basename\" for router \"ShopViewset\""
		);
	}

	#[test]
	fn test_invalid_pattern_carries_source() {
		use std::error::Error;

		let source = routeset_urls::PathPattern::new("{broken").unwrap_err();
		let error = ConfigError::InvalidPattern {
			router: "ShopViewset".to_string(),
			name: "detail_path".to_string(),
			source,
		};
		assert!(error.source().is_some());
	}
}
