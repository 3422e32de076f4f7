//! HTTP response representation and constructors.

use bytes::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::error::Result;

/// An in-process HTTP response.
///
/// Constructors cover the statuses the routing layer produces itself;
/// everything else goes through [`Response::new`].
///
/// # Examples
///
/// ```
/// use routeset_http::Response;
/// use hyper::StatusCode;
///
/// let response = Response::ok().with_body("hello");
/// assert_eq!(response.status, StatusCode::OK);
///
/// let redirect = Response::temporary_redirect("/items/");
/// assert_eq!(redirect.status, StatusCode::FOUND);
/// assert_eq!(redirect.location(), Some("/items/"));
/// ```
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	/// 302 Found redirect. The index-redirect machinery answers with this.
	pub fn temporary_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_location(location.as_ref())
	}

	/// 301 Moved Permanently redirect.
	pub fn permanent_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::MOVED_PERMANENTLY).with_location(location.as_ref())
	}

	/// Serializes `value` as a JSON body with the matching content type.
	pub fn json<T: Serialize>(value: &T) -> Result<Self> {
		let body = serde_json::to_vec(value)?;
		Ok(Self::ok()
			.with_header_value(
				header::CONTENT_TYPE,
				HeaderValue::from_static("application/json"),
			)
			.with_body(body))
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Sets a header from string parts. Invalid values are dropped rather
	/// than panicking, matching hyper's lenient builder behavior.
	pub fn with_header(mut self, name: header::HeaderName, value: &str) -> Self {
		if let Ok(header_value) = HeaderValue::from_str(value) {
			self.headers.insert(name, header_value);
		}
		self
	}

	pub fn with_header_value(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	/// Sets the Location header, typically on a redirect.
	pub fn with_location(self, location: &str) -> Self {
		self.with_header(header::LOCATION, location)
	}

	/// The Location header, if present and valid UTF-8.
	pub fn location(&self) -> Option<&str> {
		self.headers
			.get(header::LOCATION)
			.and_then(|v| v.to_str().ok())
	}

	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}
