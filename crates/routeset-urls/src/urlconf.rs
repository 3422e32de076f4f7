//! Process-wide urlconf registration.
//!
//! Template and view code call [`reverse`] without a tree in hand, the same
//! way they would in the framework this library grew out of. An application
//! registers its root tree once at startup with [`set_urlconf`]; the
//! registered [`UrlConf`] pairs the tree with a prebuilt [`Reverser`].
//!
//! Tests that touch the registry must serialize themselves (`serial_test`),
//! since the registry is shared per process.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::entry::UrlTree;
use crate::reverse::{ReverseError, ReverseResult, Reverser};

static REGISTRY: Lazy<RwLock<Option<Arc<UrlConf>>>> = Lazy::new(|| RwLock::new(None));
static SCRIPT_PREFIX: Lazy<RwLock<String>> = Lazy::new(|| RwLock::new("/".to_string()));

/// A registered root tree with its reverse index.
#[derive(Debug)]
pub struct UrlConf {
	tree: Arc<UrlTree>,
	reverser: Reverser,
}

impl UrlConf {
	pub fn new(tree: Arc<UrlTree>) -> Self {
		let reverser = Reverser::from_tree(&tree);
		Self { tree, reverser }
	}

	pub fn tree(&self) -> &Arc<UrlTree> {
		&self.tree
	}

	pub fn reverser(&self) -> &Reverser {
		&self.reverser
	}
}

/// Registers `tree` as the process root, replacing any previous one, and
/// returns the built [`UrlConf`].
pub fn set_urlconf(tree: Arc<UrlTree>) -> Arc<UrlConf> {
	let conf = Arc::new(UrlConf::new(tree));
	tracing::debug!(
		names = conf.reverser.names().count(),
		"registered root urlconf"
	);
	*REGISTRY.write() = Some(conf.clone());
	conf
}

/// Drops the registered root, if any.
pub fn clear_urlconf() {
	*REGISTRY.write() = None;
}

pub fn get_urlconf() -> Option<Arc<UrlConf>> {
	REGISTRY.read().clone()
}

/// Reverses `name` against the registered root, applying the script prefix.
///
/// # Errors
///
/// [`ReverseError::NoUrlconf`] when nothing is registered, otherwise the
/// underlying [`Reverser`] errors.
pub fn reverse(name: &str, args: &[&str], kwargs: &[(&str, &str)]) -> ReverseResult<String> {
	let conf = get_urlconf().ok_or(ReverseError::NoUrlconf)?;
	let path = conf.reverser.reverse(name, args, kwargs)?;
	Ok(apply_script_prefix(&path))
}

/// Reverses `name` inside a namespace scope, applying the script prefix.
///
/// See [`Reverser::reverse_in_scope`] for the lookup rules.
///
/// # Errors
///
/// [`ReverseError::NoUrlconf`] when nothing is registered, otherwise the
/// underlying [`Reverser`] errors.
pub fn reverse_scoped(
	scope: &[&str],
	name: &str,
	args: &[&str],
	kwargs: &[(&str, &str)],
) -> ReverseResult<String> {
	let conf = get_urlconf().ok_or(ReverseError::NoUrlconf)?;
	let path = conf.reverser.reverse_in_scope(scope, name, args, kwargs)?;
	Ok(apply_script_prefix(&path))
}

/// Sets the URL prefix this process is mounted under (for deployments behind
/// a path-rewriting proxy). Normalized to `/prefix/` form.
pub fn set_script_prefix(prefix: &str) {
	let mut normalized = String::from("/");
	let trimmed = prefix.trim_matches('/');
	if !trimmed.is_empty() {
		normalized.push_str(trimmed);
		normalized.push('/');
	}
	*SCRIPT_PREFIX.write() = normalized;
}

pub fn get_script_prefix() -> String {
	SCRIPT_PREFIX.read().clone()
}

fn apply_script_prefix(path: &str) -> String {
	let prefix = get_script_prefix();
	if prefix == "/" {
		return path.to_string();
	}
	format!("{}{}", prefix, path.strip_prefix('/').unwrap_or(path))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entry::path;
	use routeset_http::{FnView, Request, Response, View};
	use serial_test::serial;

	fn view() -> Arc<dyn View> {
		Arc::new(FnView::new(|_request: Request| async {
			Ok(Response::ok())
		}))
	}

	fn root() -> Arc<UrlTree> {
		Arc::new(
			UrlTree::new(vec![
				path("items/{pk:int}/", view(), "detail").unwrap().into(),
			])
			.with_namespace("shop"),
		)
	}

	#[test]
	#[serial(urlconf)]
	fn test_reverse_requires_registration() {
		clear_urlconf();
		assert!(matches!(
			reverse("shop:detail", &[], &[]),
			Err(ReverseError::NoUrlconf)
		));
	}

	#[test]
	#[serial(urlconf)]
	fn test_registered_reverse() {
		set_urlconf(root());
		assert_eq!(
			reverse("shop:detail", &[], &[("pk", "3")]).unwrap(),
			"/items/3/"
		);
		clear_urlconf();
		assert!(get_urlconf().is_none());
	}

	#[test]
	#[serial(urlconf)]
	fn test_script_prefix_applies_and_normalizes() {
		set_urlconf(root());
		set_script_prefix("app");
		assert_eq!(get_script_prefix(), "/app/");
		assert_eq!(
			reverse("shop:detail", &[], &[("pk", "3")]).unwrap(),
			"/app/items/3/"
		);
		set_script_prefix("/");
		assert_eq!(get_script_prefix(), "/");
		clear_urlconf();
	}
}
