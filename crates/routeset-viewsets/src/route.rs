//! A mounted child router.

use routeset_urls::PathPattern;

use crate::viewset::Viewset;

/// A child router instance bound under a URL prefix.
///
/// Routes are produced during instantiation, one fresh child per owner, so
/// two owners never share a child instance. The prefix is compiled up front;
/// its parameter names are added to the child's consumed set.
#[derive(Debug)]
pub struct Route {
	prefix: PathPattern,
	viewset: Viewset,
}

impl Route {
	pub(crate) fn from_parts(prefix: PathPattern, viewset: Viewset) -> Self {
		Self { prefix, viewset }
	}

	pub fn prefix(&self) -> &PathPattern {
		&self.prefix
	}

	pub fn viewset(&self) -> &Viewset {
		&self.viewset
	}
}
