//! Path converters.
//!
//! A converter names the shape of one URL parameter: the regex fragment used
//! when a pattern is compiled, and a validation check used when a URL is
//! built back from parameters by [`reverse`](crate::reverse). Patterns select
//! converters by name: `{pk:int}`, `{slug:slug}`, `{rest:path}`. A bare
//! `{name}` means `str`, and `{name:*}` is shorthand for `path`.

/// One named parameter shape.
pub trait Converter: Send + Sync {
	/// Registry name, as written between `:` and `}` in a pattern.
	fn name(&self) -> &'static str;

	/// Regex fragment the parameter compiles to. Never contains capture
	/// groups of its own.
	fn pattern(&self) -> &'static str;

	/// Whether `value` is acceptable for this parameter when reversing.
	fn check(&self, value: &str) -> bool;
}

/// Any non-empty text without a path separator. The default.
pub struct StrConverter;

impl Converter for StrConverter {
	fn name(&self) -> &'static str {
		"str"
	}

	fn pattern(&self) -> &'static str {
		"[^/]+"
	}

	fn check(&self, value: &str) -> bool {
		!value.is_empty() && !value.contains('/')
	}
}

/// Decimal digits.
pub struct IntConverter;

impl Converter for IntConverter {
	fn name(&self) -> &'static str {
		"int"
	}

	fn pattern(&self) -> &'static str {
		"[0-9]+"
	}

	fn check(&self, value: &str) -> bool {
		!value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
	}
}

/// Letters, digits, hyphens, underscores.
pub struct SlugConverter;

impl Converter for SlugConverter {
	fn name(&self) -> &'static str {
		"slug"
	}

	fn pattern(&self) -> &'static str {
		"[-a-zA-Z0-9_]+"
	}

	fn check(&self, value: &str) -> bool {
		!value.is_empty()
			&& value
				.bytes()
				.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
	}
}

/// Hyphenated lowercase UUID, e.g. `075194d3-6885-417e-a8a8-6c931e272f00`.
pub struct UuidConverter;

impl Converter for UuidConverter {
	fn name(&self) -> &'static str {
		"uuid"
	}

	fn pattern(&self) -> &'static str {
		"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
	}

	fn check(&self, value: &str) -> bool {
		let bytes = value.as_bytes();
		if bytes.len() != 36 {
			return false;
		}
		for (i, b) in bytes.iter().enumerate() {
			match i {
				8 | 13 | 18 | 23 => {
					if *b != b'-' {
						return false;
					}
				}
				_ => {
					if !b.is_ascii_hexdigit() || b.is_ascii_uppercase() {
						return false;
					}
				}
			}
		}
		true
	}
}

/// Any non-empty text, slashes included. Greedy; use for tail segments.
pub struct PathConverter;

impl Converter for PathConverter {
	fn name(&self) -> &'static str {
		"path"
	}

	fn pattern(&self) -> &'static str {
		".+"
	}

	fn check(&self, value: &str) -> bool {
		!value.is_empty()
	}
}

static STR: StrConverter = StrConverter;
static INT: IntConverter = IntConverter;
static SLUG: SlugConverter = SlugConverter;
static UUID: UuidConverter = UuidConverter;
static PATH: PathConverter = PathConverter;

/// Looks up a converter by registry name.
///
/// # Examples
///
/// ```
/// use routeset_urls::converters::get_converter;
///
/// assert!(get_converter("int").is_some());
/// assert!(get_converter("year").is_none());
/// ```
pub fn get_converter(name: &str) -> Option<&'static dyn Converter> {
	match name {
		"str" => Some(&STR),
		"int" => Some(&INT),
		"slug" => Some(&SLUG),
		"uuid" => Some(&UUID),
		// "*" is the wildcard spelling used inside patterns.
		"path" | "*" => Some(&PATH),
		_ => None,
	}
}

/// The default converter for bare `{name}` parameters.
pub fn default_converter() -> &'static dyn Converter {
	&STR
}
