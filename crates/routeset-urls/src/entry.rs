//! Pattern lists: the entries a router mounts and the trees they form.
//!
//! A [`UrlTree`] is the `(pattern list, app_name, namespace)` triple routers
//! hand to the resolver. Entries are either a concrete [`UrlPattern`] or a
//! [`UrlInclude`] nesting another tree under a prefix.

use std::fmt;
use std::sync::Arc;

use routeset_http::View;
use serde_json::{Map, Value};

use crate::pattern::{PathPattern, PatternResult};

/// A concrete URL rule: compiled pattern, view, optional name, metadata.
#[derive(Clone)]
pub struct UrlPattern {
	pattern: PathPattern,
	view: Arc<dyn View>,
	name: Option<String>,
	extras: Map<String, Value>,
	index_redirect: bool,
}

impl UrlPattern {
	/// Compiles `route` and pairs it with a view.
	pub fn new(route: &str, view: Arc<dyn View>) -> PatternResult<Self> {
		Ok(Self::from_pattern(PathPattern::new(route)?, view))
	}

	/// Pairs an already-compiled pattern with a view.
	pub fn from_pattern(pattern: PathPattern, view: Arc<dyn View>) -> Self {
		Self {
			pattern,
			view,
			name: None,
			extras: Map::new(),
			index_redirect: false,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Menu annotation: display title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.extras
			.insert("title".to_string(), Value::String(title.into()));
		self
	}

	/// Menu annotation: icon identifier.
	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.extras
			.insert("icon".to_string(), Value::String(icon.into()));
		self
	}

	/// Attaches arbitrary metadata, carried into the resolved match.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extras.insert(key.into(), value.into());
		self
	}

	/// Marks this entry as the automatic index redirect so index-target
	/// scanning never selects it.
	pub fn mark_index_redirect(mut self) -> Self {
		self.index_redirect = true;
		self
	}

	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	pub fn view(&self) -> Arc<dyn View> {
		self.view.clone()
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn extras(&self) -> &Map<String, Value> {
		&self.extras
	}

	pub fn title(&self) -> Option<&str> {
		self.extras.get("title").and_then(Value::as_str)
	}

	pub fn icon(&self) -> Option<&str> {
		self.extras.get("icon").and_then(Value::as_str)
	}

	/// Whether this pattern was declared through the menu-annotated helper.
	pub fn is_menu_annotated(&self) -> bool {
		self.extras.contains_key("title") || self.extras.contains_key("icon")
	}

	pub fn is_index_redirect(&self) -> bool {
		self.index_redirect
	}
}

impl fmt::Debug for UrlPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UrlPattern")
			.field("pattern", &self.pattern.as_str())
			.field("name", &self.name)
			.field("index_redirect", &self.index_redirect)
			.finish()
	}
}

/// A nested pattern list mounted under a prefix.
#[derive(Debug, Clone)]
pub struct UrlInclude {
	prefix: PathPattern,
	tree: UrlTree,
}

impl UrlInclude {
	pub fn new(prefix: &str, tree: UrlTree) -> PatternResult<Self> {
		Ok(Self {
			prefix: PathPattern::new(prefix)?,
			tree,
		})
	}

	pub fn from_pattern(prefix: PathPattern, tree: UrlTree) -> Self {
		Self { prefix, tree }
	}

	pub fn prefix(&self) -> &PathPattern {
		&self.prefix
	}

	pub fn tree(&self) -> &UrlTree {
		&self.tree
	}
}

/// One mounted entry.
#[derive(Debug, Clone)]
pub enum UrlEntry {
	Pattern(UrlPattern),
	Include(UrlInclude),
}

impl UrlEntry {
	/// The declared name, when the entry is a named pattern.
	pub fn name(&self) -> Option<&str> {
		match self {
			UrlEntry::Pattern(p) => p.name(),
			UrlEntry::Include(_) => None,
		}
	}
}

impl From<UrlPattern> for UrlEntry {
	fn from(pattern: UrlPattern) -> Self {
		UrlEntry::Pattern(pattern)
	}
}

impl From<UrlInclude> for UrlEntry {
	fn from(include: UrlInclude) -> Self {
		UrlEntry::Include(include)
	}
}

/// An ordered pattern list with its namespace scope and static metadata.
///
/// The resolver merges `extras` into every match produced beneath this tree;
/// routers use that to record which of them owns a matched path.
#[derive(Debug, Clone, Default)]
pub struct UrlTree {
	entries: Vec<UrlEntry>,
	app_name: Option<String>,
	namespace: Option<String>,
	extras: Map<String, Value>,
}

impl UrlTree {
	pub fn new(entries: Vec<UrlEntry>) -> Self {
		Self {
			entries,
			..Self::default()
		}
	}

	pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
		self.app_name = Some(app_name.into());
		self
	}

	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extras.insert(key.into(), value.into());
		self
	}

	pub fn entries(&self) -> &[UrlEntry] {
		&self.entries
	}

	pub fn app_name(&self) -> Option<&str> {
		self.app_name.as_deref()
	}

	pub fn namespace(&self) -> Option<&str> {
		self.namespace.as_deref()
	}

	/// The namespace used for reverse lookup scoping: the explicit
	/// `namespace`, falling back to `app_name`.
	pub fn effective_namespace(&self) -> Option<&str> {
		self.namespace.as_deref().or(self.app_name.as_deref())
	}

	pub fn extras(&self) -> &Map<String, Value> {
		&self.extras
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}

/// Declares a named pattern.
///
/// # Examples
///
/// ```
/// use routeset_urls::{path, UrlTree};
/// use routeset_http::{FnView, Request, Response};
/// use std::sync::Arc;
///
/// let view = Arc::new(FnView::new(|_request: Request| async {
///     Ok(Response::ok())
/// }));
/// let tree = UrlTree::new(vec![
///     path("articles/{pk:int}/", view, "detail").unwrap().into(),
/// ]);
/// assert_eq!(tree.len(), 1);
/// ```
pub fn path(route: &str, view: Arc<dyn View>, name: &str) -> PatternResult<UrlPattern> {
	Ok(UrlPattern::new(route, view)?.with_name(name))
}

/// Declares a named pattern carrying menu annotations. Items built this way
/// surface in composed menus.
pub fn menu_path(
	route: &str,
	view: Arc<dyn View>,
	name: &str,
	title: Option<&str>,
	icon: Option<&str>,
) -> PatternResult<UrlPattern> {
	let mut pattern = path(route, view, name)?;
	if let Some(title) = title {
		pattern = pattern.with_title(title);
	}
	if let Some(icon) = icon {
		pattern = pattern.with_icon(icon);
	}
	Ok(pattern)
}

/// Mounts a nested tree under a prefix.
pub fn include(prefix: &str, tree: UrlTree) -> PatternResult<UrlEntry> {
	Ok(UrlEntry::Include(UrlInclude::new(prefix, tree)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use routeset_http::{FnView, Request, Response};

	fn view() -> Arc<dyn View> {
		Arc::new(FnView::new(|_request: Request| async {
			Ok(Response::ok())
		}))
	}

	#[test]
	fn test_menu_annotation_detection() {
		let plain = path("a/", view(), "a").unwrap();
		assert!(!plain.is_menu_annotated());

		let annotated = menu_path("b/", view(), "b", Some("Reports"), None).unwrap();
		assert!(annotated.is_menu_annotated());
		assert_eq!(annotated.title(), Some("Reports"));
		assert_eq!(annotated.icon(), None);
	}

	#[test]
	fn test_effective_namespace_falls_back_to_app_name() {
		let tree = UrlTree::new(vec![]).with_app_name("shop");
		assert_eq!(tree.effective_namespace(), Some("shop"));

		let tree = tree.with_namespace("store");
		assert_eq!(tree.effective_namespace(), Some("store"));
	}

	#[test]
	fn test_invalid_route_propagates() {
		assert!(path("items/{", view(), "broken").is_err());
		assert!(include("items/{", UrlTree::default()).is_err());
	}
}
