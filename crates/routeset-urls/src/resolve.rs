//! Tree resolution with metadata propagation.
//!
//! Resolution walks a [`UrlTree`] depth-first in declaration order. When a
//! match comes back out through nested includes, each enclosing tree merges
//! its static extras into the match and prepends its namespace, so a leaf
//! match carries merged metadata from every ancestor.
//!
//! Merge precedence is fixed: **outer wins**. An enclosing tree's extras are
//! applied after the nested match's, overwriting on key conflict. Captured
//! path parameters follow the opposite, conventional rule: the innermost
//! capture of a name is kept.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use routeset_http::{Error, Request, Response, View};
use serde_json::{Map, Value};
use thiserror::Error as ThisError;

use crate::entry::{UrlEntry, UrlTree};

#[derive(Debug, Clone, ThisError)]
pub enum ResolveError {
	#[error("No pattern matched path {0:?}")]
	NotFound(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// A URL name carrying resolution metadata.
///
/// Wrapping is idempotent: building a `ResolvedName` from one that already
/// carries metadata keeps that metadata, so annotation layers never erase
/// each other.
///
/// # Examples
///
/// ```
/// use routeset_urls::resolve::ResolvedName;
///
/// let name = ResolvedName::wrap("detail");
/// let rewrapped = ResolvedName::wrap(name.clone());
/// assert_eq!(rewrapped, name);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedName {
	name: Option<String>,
	extras: Map<String, Value>,
}

impl ResolvedName {
	/// Wraps a plain name or passes an already-wrapped one through.
	pub fn wrap(value: impl Into<ResolvedName>) -> Self {
		value.into()
	}

	/// Wraps a name together with pattern-level metadata.
	pub fn with_extras(name: Option<String>, extras: Map<String, Value>) -> Self {
		Self { name, extras }
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn extras(&self) -> &Map<String, Value> {
		&self.extras
	}

	/// Applies an enclosing scope's extras. Outer wins: existing keys are
	/// overwritten.
	pub fn merge_outer(&mut self, extras: &Map<String, Value>) {
		for (key, value) in extras {
			self.extras.insert(key.clone(), value.clone());
		}
	}
}

impl From<Option<String>> for ResolvedName {
	fn from(name: Option<String>) -> Self {
		Self {
			name,
			extras: Map::new(),
		}
	}
}

impl From<&str> for ResolvedName {
	fn from(name: &str) -> Self {
		Self {
			name: Some(name.to_string()),
			extras: Map::new(),
		}
	}
}

/// The outcome of resolving a path against a tree.
#[derive(Clone)]
pub struct ResolvedMatch {
	view: Arc<dyn View>,
	/// Captured path parameters, innermost capture winning name conflicts.
	pub kwargs: HashMap<String, String>,
	/// The matched pattern's name, with merged ancestor metadata.
	pub name: ResolvedName,
	/// Namespaces crossed on the way in, outermost first.
	pub namespaces: Vec<String>,
	/// The concatenated route pattern that matched.
	pub route: String,
}

impl ResolvedMatch {
	pub fn view(&self) -> Arc<dyn View> {
		self.view.clone()
	}

	pub fn url_name(&self) -> Option<&str> {
		self.name.name()
	}

	pub fn extras(&self) -> &Map<String, Value> {
		self.name.extras()
	}

	/// The fully namespaced name, `ns1:ns2:name`. Falls back to the route
	/// string for unnamed patterns.
	pub fn view_name(&self) -> String {
		let leaf = self
			.url_name()
			.map(str::to_string)
			.unwrap_or_else(|| self.route.clone());
		if self.namespaces.is_empty() {
			leaf
		} else {
			format!("{}:{}", self.namespaces.join(":"), leaf)
		}
	}
}

impl fmt::Debug for ResolvedMatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResolvedMatch")
			.field("route", &self.route)
			.field("name", &self.name)
			.field("namespaces", &self.namespaces)
			.field("kwargs", &self.kwargs)
			.finish()
	}
}

/// Resolves `path` against `tree`.
///
/// A single leading slash on `path` is ignored; tree routes are relative.
pub fn resolve(tree: &UrlTree, path: &str) -> ResolveResult<ResolvedMatch> {
	let trimmed = path.strip_prefix('/').unwrap_or(path);
	let mut matched = resolve_entries(tree, trimmed)
		.ok_or_else(|| ResolveError::NotFound(path.to_string()))?;
	apply_tree_scope(&mut matched, tree);
	Ok(matched)
}

fn resolve_entries(tree: &UrlTree, path: &str) -> Option<ResolvedMatch> {
	for entry in tree.entries() {
		match entry {
			UrlEntry::Pattern(pattern) => {
				if let Some(kwargs) = pattern.pattern().matches(path) {
					return Some(ResolvedMatch {
						view: pattern.view(),
						kwargs,
						name: ResolvedName::with_extras(
							pattern.name().map(str::to_string),
							pattern.extras().clone(),
						),
						namespaces: Vec::new(),
						route: pattern.pattern().as_str().to_string(),
					});
				}
			}
			UrlEntry::Include(include) => {
				if let Some((outer_params, rest)) = include.prefix().match_prefix(path) {
					if let Some(mut matched) = resolve_entries(include.tree(), rest) {
						apply_tree_scope(&mut matched, include.tree());
						for (key, value) in outer_params {
							// Innermost capture wins for params.
							matched.kwargs.entry(key).or_insert(value);
						}
						matched.route =
							format!("{}{}", include.prefix().as_str(), matched.route);
						return Some(matched);
					}
				}
			}
		}
	}
	None
}

fn apply_tree_scope(matched: &mut ResolvedMatch, tree: &UrlTree) {
	if let Some(namespace) = tree.effective_namespace() {
		matched.namespaces.insert(0, namespace.to_string());
	}
	matched.name.merge_outer(tree.extras());
}

/// Resolves and dispatches: fills `path_params`, stores the match in the
/// request extensions, and calls the view.
///
/// # Errors
///
/// [`Error::NotFound`] when nothing matches; otherwise whatever the view
/// returns.
pub async fn dispatch(tree: &UrlTree, mut request: Request) -> routeset_http::Result<Response> {
	let matched = resolve(tree, request.path())
		.map_err(|_| Error::NotFound(format!("no route for {}", request.path())))?;
	for (key, value) in &matched.kwargs {
		request.set_path_param(key.clone(), value.clone());
	}
	let view = matched.view();
	request.extensions.insert(matched);
	view.dispatch(request).await
}
