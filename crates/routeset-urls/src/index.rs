//! Default-landing ("index") target selection and the redirect view.
//!
//! A composite router visited at its bare prefix answers with a redirect to
//! the first concrete page inside it. Target selection is deterministic:
//! depth-first over the pattern list in declaration order, except that
//! entries named `index` at each level are tried last, since an index page
//! must not become the target of the index redirect.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use routeset_http::{Error, Request, Response, Result, View};

use crate::entry::{UrlEntry, UrlTree};

/// Finds the relative path of the best index target inside `tree`.
///
/// A leaf qualifies when it is parameterless, is not itself the index
/// redirect, and composes to a non-empty path (an empty composition is the
/// bare prefix the redirect answers for). Includes with parameterized
/// prefixes cannot compose a concrete URL and are skipped whole.
pub fn find_index_target(tree: &UrlTree) -> Option<String> {
	scan(tree, "")
}

fn scan(tree: &UrlTree, prefix: &str) -> Option<String> {
	let (others, index_named): (Vec<&UrlEntry>, Vec<&UrlEntry>) = tree
		.entries()
		.iter()
		.partition(|entry| entry.name() != Some("index"));

	for entry in others.into_iter().chain(index_named) {
		match entry {
			UrlEntry::Pattern(pattern) => {
				if pattern.is_index_redirect() || !pattern.pattern().is_parameterless() {
					continue;
				}
				let composed = format!("{}{}", prefix, pattern.pattern().as_str());
				if composed.is_empty() {
					continue;
				}
				return Some(composed);
			}
			UrlEntry::Include(include) => {
				if !include.prefix().is_parameterless() {
					continue;
				}
				let nested = format!("{}{}", prefix, include.prefix().as_str());
				if let Some(found) = scan(include.tree(), &nested) {
					return Some(found);
				}
			}
		}
	}
	None
}

/// The view mounted at a composite's bare prefix.
///
/// Holds a weak handle to the tree it lives in; the owning router attaches
/// the handle right after the tree is built. The target is computed on first
/// request and memoized, which is sound because the tree never changes after
/// construction.
#[derive(Debug, Default)]
pub struct IndexRedirectView {
	tree: OnceCell<Weak<UrlTree>>,
	target: OnceCell<String>,
}

impl IndexRedirectView {
	pub fn new() -> Self {
		Self::default()
	}

	/// Points the view at the tree it should scan. Called once by the owner
	/// after assembling the tree; later calls are ignored.
	pub fn attach(&self, tree: &Arc<UrlTree>) {
		let _ = self.tree.set(Arc::downgrade(tree));
	}

	fn target(&self) -> Result<&str> {
		self.target
			.get_or_try_init(|| {
				let tree = self
					.tree
					.get()
					.and_then(Weak::upgrade)
					.ok_or_else(|| {
						Error::ImproperlyConfigured(
							"index redirect is not attached to a pattern tree".to_string(),
						)
					})?;
				find_index_target(&tree).ok_or_else(|| {
					Error::ImproperlyConfigured(
						"no suitable index target found; declare an explicit index route"
							.to_string(),
					)
				})
			})
			.map(String::as_str)
	}
}

#[async_trait]
impl View for IndexRedirectView {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		let target = self.target()?;
		let mut location = request.path().to_string();
		if !location.ends_with('/') {
			location.push('/');
		}
		location.push_str(target);
		Ok(Response::temporary_redirect(location))
	}
}
