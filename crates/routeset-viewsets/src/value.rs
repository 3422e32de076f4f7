//! Configuration values and keyword-argument filtering.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// A plain configuration attribute on a router.
///
/// `Unset` is a real value, not an absence: it marks an attribute that was
/// declared without content. Build steps and [`filter_kwargs`] skip it, while
/// a missing key means the name was never declared at all. The distinction
/// matters for override validation, which accepts any declared name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Unset,
	Null,
	Bool(bool),
	Int(i64),
	Str(String),
	Json(JsonValue),
}

impl Value {
	pub fn is_unset(&self) -> bool {
		matches!(self, Value::Unset)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(value) => Some(*value),
			_ => None,
		}
	}

	/// JSON rendition; `Unset` and `Null` both map to JSON null.
	pub fn to_json(&self) -> JsonValue {
		match self {
			Value::Unset | Value::Null => JsonValue::Null,
			Value::Bool(value) => JsonValue::Bool(*value),
			Value::Int(value) => JsonValue::from(*value),
			Value::Str(value) => JsonValue::String(value.clone()),
			Value::Json(value) => value.clone(),
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Str(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Str(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int(value)
	}
}

impl From<JsonValue> for Value {
	fn from(value: JsonValue) -> Self {
		Value::Json(value)
	}
}

/// Ordered attribute map, as merged from a definition and its overrides.
pub type Kwargs = IndexMap<String, Value>;

/// Keeps only the entries named in `accepted` whose value is set.
///
/// Routers use this to hand instance configuration to a view factory without
/// leaking parameters the factory does not take.
///
/// # Examples
///
/// ```
/// use routeset_viewsets::value::{Kwargs, Value, filter_kwargs};
///
/// let mut kwargs = Kwargs::new();
/// kwargs.insert("page_size".to_string(), Value::Int(25));
/// kwargs.insert("ordering".to_string(), Value::Unset);
/// kwargs.insert("template".to_string(), Value::Str("list.html".to_string()));
///
/// let filtered = filter_kwargs(&["page_size", "ordering"], &kwargs);
/// assert_eq!(filtered.len(), 1);
/// assert_eq!(filtered.get("page_size"), Some(&Value::Int(25)));
/// ```
pub fn filter_kwargs(accepted: &[&str], kwargs: &Kwargs) -> Kwargs {
	kwargs
		.iter()
		.filter(|(name, value)| accepted.contains(&name.as_str()) && !value.is_unset())
		.map(|(name, value)| (name.clone(), value.clone()))
		.collect()
}
