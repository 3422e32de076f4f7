//! URL pattern compilation and matching.
//!
//! A [`PathPattern`] is one route string compiled to a regex. Routes are
//! relative (no leading slash) and parameterized with brace placeholders:
//!
//! ```
//! use routeset_urls::pattern::PathPattern;
//!
//! let pattern = PathPattern::new("articles/{pk:int}/").unwrap();
//! let params = pattern.matches("articles/42/").unwrap();
//! assert_eq!(params.get("pk"), Some(&"42".to_string()));
//! assert!(pattern.matches("articles/abc/").is_none());
//! ```
//!
//! `{name}` uses the `str` converter; `{name:int}`, `{name:slug}`,
//! `{name:uuid}`, and `{name:path}` select others; `{name:*}` is the greedy
//! tail shorthand for `path`.

use std::collections::HashMap;
use std::fmt;

use regex::{Captures, Regex, RegexBuilder};
use thiserror::Error as ThisError;

use crate::converters::{Converter, default_converter, get_converter};

/// Longest accepted route string, in bytes.
pub const MAX_PATTERN_LENGTH: usize = 1024;
/// Most path segments a single route may declare.
pub const MAX_SEGMENTS: usize = 32;
/// Compiled regex size cap.
const MAX_COMPILED_SIZE: usize = 1 << 20;

#[derive(Debug, ThisError)]
pub enum PatternError {
	#[error("Pattern too long ({length} bytes, max {MAX_PATTERN_LENGTH}): {route}")]
	TooLong { route: String, length: usize },

	#[error("Pattern has too many segments (max {MAX_SEGMENTS}): {route}")]
	TooManySegments { route: String },

	#[error("Unbalanced braces in pattern: {route}")]
	UnbalancedBrace { route: String },

	#[error("Empty parameter name in pattern: {route}")]
	EmptyParamName { route: String },

	#[error("Invalid parameter name {name:?} in pattern: {route}")]
	InvalidParamName { route: String, name: String },

	#[error("Duplicate parameter {name:?} in pattern: {route}")]
	DuplicateParam { route: String, name: String },

	#[error("Unknown converter {converter:?} in pattern: {route}")]
	UnknownConverter { route: String, converter: String },

	#[error("Pattern {route} failed to compile: {source}")]
	Regex {
		route: String,
		#[source]
		source: regex::Error,
	},
}

pub type PatternResult<T> = Result<T, PatternError>;

/// One declared parameter of a pattern.
#[derive(Clone)]
pub struct ParamSpec {
	name: String,
	/// The exact placeholder text as written, e.g. `{pk:int}`. Reverse
	/// substitution replaces this token in the route string.
	token: String,
	converter: &'static dyn Converter,
}

impl ParamSpec {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn token(&self) -> &str {
		&self.token
	}

	pub fn converter(&self) -> &'static dyn Converter {
		self.converter
	}
}

impl fmt::Debug for ParamSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ParamSpec")
			.field("name", &self.name)
			.field("converter", &self.converter.name())
			.finish()
	}
}

/// A compiled route string.
///
/// Matching is anchored at the start; [`PathPattern::matches`] requires the
/// whole input to be consumed while [`PathPattern::match_prefix`] returns the
/// unconsumed tail for nested resolution.
#[derive(Debug, Clone)]
pub struct PathPattern {
	route: String,
	regex: Regex,
	params: Vec<ParamSpec>,
}

impl PathPattern {
	pub fn new(route: impl Into<String>) -> PatternResult<Self> {
		let route = route.into();
		if route.len() > MAX_PATTERN_LENGTH {
			return Err(PatternError::TooLong {
				length: route.len(),
				route,
			});
		}
		if route.split('/').count() > MAX_SEGMENTS {
			return Err(PatternError::TooManySegments { route });
		}

		let (regex_src, params) = Self::compile(&route)?;
		let regex = RegexBuilder::new(&regex_src)
			.size_limit(MAX_COMPILED_SIZE)
			.build()
			.map_err(|source| PatternError::Regex {
				route: route.clone(),
				source,
			})?;

		Ok(Self {
			route,
			regex,
			params,
		})
	}

	fn compile(route: &str) -> PatternResult<(String, Vec<ParamSpec>)> {
		let mut regex_src = String::from("^");
		let mut params: Vec<ParamSpec> = Vec::new();
		let mut remaining = route;

		while let Some(open) = remaining.find(|c| c == '{' || c == '}') {
			let (literal, after) = remaining.split_at(open);
			regex_src.push_str(&regex::escape(literal));

			if after.starts_with('}') {
				return Err(PatternError::UnbalancedBrace {
					route: route.to_string(),
				});
			}
			let body_and_rest = &after[1..];
			let close = body_and_rest
				.find(|c| c == '{' || c == '}')
				.filter(|&i| body_and_rest.as_bytes()[i] == b'}')
				.ok_or_else(|| PatternError::UnbalancedBrace {
					route: route.to_string(),
				})?;
			let body = &body_and_rest[..close];
			remaining = &body_and_rest[close + 1..];

			let (name, converter) = match body.split_once(':') {
				Some((name, converter)) => {
					let converter =
						get_converter(converter).ok_or_else(|| PatternError::UnknownConverter {
							route: route.to_string(),
							converter: converter.to_string(),
						})?;
					(name, converter)
				}
				None => (body, default_converter()),
			};

			if name.is_empty() {
				return Err(PatternError::EmptyParamName {
					route: route.to_string(),
				});
			}
			if !Self::is_valid_name(name) {
				return Err(PatternError::InvalidParamName {
					route: route.to_string(),
					name: name.to_string(),
				});
			}
			if params.iter().any(|p| p.name == name) {
				return Err(PatternError::DuplicateParam {
					route: route.to_string(),
					name: name.to_string(),
				});
			}

			regex_src.push_str("(?P<");
			regex_src.push_str(name);
			regex_src.push('>');
			regex_src.push_str(converter.pattern());
			regex_src.push(')');

			params.push(ParamSpec {
				name: name.to_string(),
				token: format!("{{{body}}}"),
				converter,
			});
		}
		regex_src.push_str(&regex::escape(remaining));

		Ok((regex_src, params))
	}

	fn is_valid_name(name: &str) -> bool {
		let mut chars = name.chars();
		match chars.next() {
			Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
			_ => return false,
		}
		chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
	}

	/// The route string as declared.
	pub fn as_str(&self) -> &str {
		&self.route
	}

	pub fn params(&self) -> &[ParamSpec] {
		&self.params
	}

	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.params.iter().map(|p| p.name.as_str())
	}

	/// True when the pattern declares no parameters. Index-redirect targets
	/// must be parameterless.
	pub fn is_parameterless(&self) -> bool {
		self.params.is_empty()
	}

	/// Matches the whole of `path`, returning extracted parameters.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let caps = self.regex.captures(path)?;
		if caps.get(0)?.end() != path.len() {
			return None;
		}
		Some(self.extract(&caps))
	}

	/// Matches a prefix of `path`, returning extracted parameters and the
	/// unconsumed tail.
	///
	/// # Examples
	///
	/// ```
	/// use routeset_urls::pattern::PathPattern;
	///
	/// let prefix = PathPattern::new("items/").unwrap();
	/// let (params, rest) = prefix.match_prefix("items/5/").unwrap();
	/// assert!(params.is_empty());
	/// assert_eq!(rest, "5/");
	/// ```
	pub fn match_prefix<'p>(&self, path: &'p str) -> Option<(HashMap<String, String>, &'p str)> {
		let caps = self.regex.captures(path)?;
		let end = caps.get(0)?.end();
		Some((self.extract(&caps), &path[end..]))
	}

	fn extract(&self, caps: &Captures<'_>) -> HashMap<String, String> {
		self.params
			.iter()
			.filter_map(|p| {
				caps.name(&p.name)
					.map(|m| (p.name.clone(), m.as_str().to_string()))
			})
			.collect()
	}
}

impl fmt::Display for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.route)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.route == other.route
	}
}

impl Eq for PathPattern {}
