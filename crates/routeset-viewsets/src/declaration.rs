//! Declaration values for router definitions.
//!
//! A router definition is an ordered map of named declarations. The name
//! picks the channel: names ending in `_path` declare stored patterns, names
//! starting with `get_` are getters and never become patterns, everything
//! else is a plain attribute. Route declarations are recognized by value and
//! may sit under any non-getter name. The value itself says what the
//! declaration carries, including the two sentinels `Unset` (reserved, no
//! value yet) and `Removed` (inherited name withdrawn).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use routeset_http::{AuthState, Request, View};
use serde_json::{Map, Value as JsonValue};

use crate::builder::ViewsetDef;
use crate::value::{Kwargs, Value};
use crate::viewset::Viewset;

/// The view mounted by a path declaration: a ready instance, or a factory
/// bound to the owning router's configuration at build time.
#[derive(Clone)]
pub enum ViewSpec {
	Instance(Arc<dyn View>),
	Factory(Arc<dyn ViewFactory>),
}

impl fmt::Debug for ViewSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ViewSpec::Instance(_) => f.write_str("ViewSpec::Instance"),
			ViewSpec::Factory(_) => f.write_str("ViewSpec::Factory"),
		}
	}
}

/// Builds a slot view from the owning router's filtered configuration.
pub trait ViewFactory: Send + Sync {
	/// Attribute names this factory consumes. Everything else is filtered
	/// out before [`build`](ViewFactory::build) runs.
	fn accepted_kwargs(&self) -> Vec<&'static str>;

	fn build(&self, kwargs: &Kwargs) -> Arc<dyn View>;
}

/// Object-level view permission policy.
pub trait ViewPermission: Send + Sync {
	fn has_view_permission(&self, auth: &AuthState, obj: Option<&JsonValue>) -> bool;
}

/// The default policy: everyone may view.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ViewPermission for AllowAll {
	fn has_view_permission(&self, _auth: &AuthState, _obj: Option<&JsonValue>) -> bool {
		true
	}
}

/// Router-level template context hook.
pub trait ContextProvider: Send + Sync {
	fn get_context_data(&self, viewset: &Viewset, request: &Request) -> Map<String, JsonValue>;
}

/// A stored pattern declaration: route text, view, and menu metadata.
#[derive(Clone)]
pub struct PathDef {
	route: String,
	view: ViewSpec,
	name: Option<String>,
	title: Option<String>,
	icon: Option<String>,
	extras: Map<String, JsonValue>,
}

impl PathDef {
	pub fn new(route: impl Into<String>, view: Arc<dyn View>) -> Self {
		Self::with_spec(route, ViewSpec::Instance(view))
	}

	pub fn from_factory(route: impl Into<String>, factory: Arc<dyn ViewFactory>) -> Self {
		Self::with_spec(route, ViewSpec::Factory(factory))
	}

	pub fn with_spec(route: impl Into<String>, view: ViewSpec) -> Self {
		Self {
			route: route.into(),
			view,
			name: None,
			title: None,
			icon: None,
			extras: Map::new(),
		}
	}

	/// Explicit reverse name. Defaults to the slot name with `_path`
	/// stripped.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Menu title. Setting one marks the pattern menu-annotated.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Menu icon. Setting one marks the pattern menu-annotated.
	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	/// Static metadata carried into every match of this pattern.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.extras.insert(key.into(), value.into());
		self
	}

	pub fn route(&self) -> &str {
		&self.route
	}

	pub fn view_spec(&self) -> &ViewSpec {
		&self.view
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	pub fn icon(&self) -> Option<&str> {
		self.icon.as_deref()
	}

	pub fn extras(&self) -> &Map<String, JsonValue> {
		&self.extras
	}
}

impl fmt::Debug for PathDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PathDef")
			.field("route", &self.route)
			.field("name", &self.name)
			.finish()
	}
}

/// A nesting recipe: mount a child definition under a URL prefix.
///
/// The child router is constructed fresh from the definition for every
/// owning instance, so siblings never share child state. Overrides recorded
/// here are applied to each fresh child and validated against the child
/// definition when the owning definition is built.
#[derive(Clone)]
pub struct RouteDef {
	prefix: String,
	child: Arc<ViewsetDef>,
	overrides: Overrides,
}

impl RouteDef {
	pub fn new(prefix: impl Into<String>, child: Arc<ViewsetDef>) -> Self {
		Self {
			prefix: prefix.into(),
			child,
			overrides: Overrides::new(),
		}
	}

	pub fn with_override(mut self, key: impl Into<String>, value: impl Into<Declared>) -> Self {
		self.overrides.insert(key.into(), value.into());
		self
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn child(&self) -> &Arc<ViewsetDef> {
		&self.child
	}

	pub fn overrides(&self) -> &Overrides {
		&self.overrides
	}
}

impl fmt::Debug for RouteDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteDef")
			.field("prefix", &self.prefix)
			.field("child", &self.child.name())
			.finish()
	}
}

/// One declaration on a router definition.
///
/// `Unset` reserves the name with no value: the slot exists, builds nothing,
/// and can be filled per instance. `Removed` withdraws an inherited name
/// entirely. Both are distinct from a missing key, which means the name was
/// never declared.
#[derive(Debug, Clone)]
pub enum Declared {
	Path(PathDef),
	Route(RouteDef),
	Value(Value),
	Unset,
	Removed,
}

impl From<PathDef> for Declared {
	fn from(value: PathDef) -> Self {
		Declared::Path(value)
	}
}

impl From<RouteDef> for Declared {
	fn from(value: RouteDef) -> Self {
		Declared::Route(value)
	}
}

impl From<Value> for Declared {
	fn from(value: Value) -> Self {
		Declared::Value(value)
	}
}

impl From<&str> for Declared {
	fn from(value: &str) -> Self {
		Declared::Value(Value::from(value))
	}
}

impl From<String> for Declared {
	fn from(value: String) -> Self {
		Declared::Value(Value::from(value))
	}
}

impl From<bool> for Declared {
	fn from(value: bool) -> Self {
		Declared::Value(Value::from(value))
	}
}

impl From<i64> for Declared {
	fn from(value: i64) -> Self {
		Declared::Value(Value::from(value))
	}
}

/// Constructor overrides, keyed by declaration name.
pub type Overrides = IndexMap<String, Declared>;
