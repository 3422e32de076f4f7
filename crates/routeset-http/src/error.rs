//! Error types shared by views, resolution, and middleware.

use hyper::StatusCode;
use thiserror::Error as ThisError;

use crate::Response;

/// Errors a view or the dispatch pipeline can produce.
///
/// Each variant maps to an HTTP status via [`Error::status`], so dispatch
/// code can turn any error into a response without matching at every call
/// site.
#[derive(Debug, Clone, ThisError)]
pub enum Error {
	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Raised when routing configuration is unusable at request time, for
	/// example a composite router with no qualifying index target.
	#[error("Improperly configured: {0}")]
	ImproperlyConfigured(String),

	#[error("Bad request: {0}")]
	BadRequest(String),

	#[error("Serialization error: {0}")]
	Serialization(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

/// Result alias used across the routeset crates for request-path code.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// The HTTP status this error maps to.
	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::PermissionDenied(_) => StatusCode::FORBIDDEN,
			Error::ImproperlyConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Error::BadRequest(_) => StatusCode::BAD_REQUEST,
			Error::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Render the error as a plain-text response with the mapped status.
	///
	/// # Examples
	///
	/// ```
	/// use routeset_http::Error;
	/// use hyper::StatusCode;
	///
	/// let response = Error::NotFound("no such page".into()).into_response();
	/// assert_eq!(response.status, StatusCode::NOT_FOUND);
	/// ```
	pub fn into_response(self) -> Response {
		let status = self.status();
		Response::new(status).with_body(self.to_string())
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Serialization(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_mapping() {
		assert_eq!(
			Error::NotFound("x".into()).status(),
			StatusCode::NOT_FOUND
		);
		assert_eq!(
			Error::PermissionDenied("x".into()).status(),
			StatusCode::FORBIDDEN
		);
		assert_eq!(
			Error::ImproperlyConfigured("x".into()).status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn test_into_response_carries_message() {
		let response = Error::BadRequest("missing field".into()).into_response();
		assert_eq!(response.status, StatusCode::BAD_REQUEST);
		let body = String::from_utf8_lossy(&response.body);
		assert!(body.contains("missing field"));
	}
}
