//! HTTP request representation.
//!
//! Routed views receive a [`Request`] carrying the parsed method, URI,
//! headers, and body, plus two routing artifacts: `path_params` extracted by
//! pattern matching and the type-safe [`Extensions`] store middleware uses to
//! hand data downstream.

use std::collections::HashMap;

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};
use crate::extensions::Extensions;

/// An in-process HTTP request.
///
/// # Examples
///
/// ```
/// use routeset_http::Request;
/// use hyper::Method;
///
/// let request = Request::builder()
///     .method(Method::GET)
///     .uri("/items/5/")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path(), "/items/5/");
/// ```
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Parameters extracted from the matched URL pattern. Filled in by the
	/// resolver before the view runs.
	pub path_params: HashMap<String, String>,
	/// Per-request typed storage, shared by middleware and views.
	pub extensions: Extensions,
	query_params: HashMap<String, String>,
}

impl Request {
	/// Creates a request from already-parsed parts.
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			extensions: Extensions::new(),
			query_params,
		}
	}

	/// Starts building a request. The builder validates the URI at
	/// [`RequestBuilder::build`] time.
	pub fn builder() -> RequestBuilder {
		RequestBuilder::new()
	}

	/// The request path, without query string.
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Raw query parameters as parsed from the URI.
	pub fn query_params(&self) -> &HashMap<String, String> {
		&self.query_params
	}

	/// Query parameters with percent-encoding decoded.
	///
	/// # Examples
	///
	/// ```
	/// use routeset_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/search?q=hello%20world")
	///     .build()
	///     .unwrap();
	///
	/// let decoded = request.decoded_query_params();
	/// assert_eq!(decoded.get("q"), Some(&"hello world".to_string()));
	/// ```
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_params
			.iter()
			.map(|(k, v)| {
				let key = percent_decode_str(k).decode_utf8_lossy().to_string();
				let value = percent_decode_str(v).decode_utf8_lossy().to_string();
				(key, value)
			})
			.collect()
	}

	/// Looks up a parameter extracted from the matched URL pattern.
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Sets a single path parameter. Resolvers use this when extracting
	/// pattern variables.
	pub fn set_path_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(name.into(), value.into());
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter_map(|pair| {
						// Split on the first '=' only so values may contain '='.
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
}

impl RequestBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Finalizes the request.
	///
	/// # Errors
	///
	/// Returns [`Error::BadRequest`] if the URI does not parse.
	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.unwrap_or_else(|| "/".to_string())
			.parse()
			.map_err(|e| Error::BadRequest(format!("invalid uri: {e}")))?;
		Ok(Request::new(
			self.method.unwrap_or(Method::GET),
			uri,
			self.version,
			self.headers,
			self.body,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn get(uri: &str) -> Request {
		Request::builder()
			.method(Method::GET)
			.uri(uri)
			.build()
			.unwrap()
	}

	#[test]
	fn test_path_strips_query() {
		let request = get("/items/?page=2");
		assert_eq!(request.path(), "/items/");
		assert_eq!(request.query_params().get("page"), Some(&"2".to_string()));
	}

	#[test]
	fn test_query_value_keeps_equals_sign() {
		let request = get("/cb?token=a=b");
		assert_eq!(
			request.query_params().get("token"),
			Some(&"a=b".to_string())
		);
	}

	#[test]
	fn test_path_params_roundtrip() {
		let mut request = get("/items/5/");
		request.set_path_param("pk", "5");
		assert_eq!(request.path_param("pk"), Some("5"));
		assert_eq!(request.path_param("missing"), None);
	}

	#[test]
	fn test_invalid_uri_is_bad_request() {
		let result = Request::builder().uri("http://[broken").build();
		assert!(matches!(result, Err(Error::BadRequest(_))));
	}
}
