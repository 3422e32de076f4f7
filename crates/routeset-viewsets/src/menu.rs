//! Menu composition.
//!
//! A composite router presents its contents as an ordered list of navigable
//! items, drawn from two sources in a fixed order: first every direct child
//! router that opted into menus, in mount order (route slots before
//! registered subs), then every menu-annotated pattern in the router's own
//! resolved list, synthesized into a plain descriptor.
//!
//! Composition never filters by permission. The presentation layer decides
//! visibility per item, consuming
//! [`has_view_permission`](crate::viewset::Viewset::has_view_permission) on
//! child routers and on the composing router for pattern descriptors.

use routeset_urls::UrlEntry;
use serde::Serialize;

use crate::builder::humanize;
use crate::error::ConfigResult;
use crate::viewset::Viewset;

/// A synthesized descriptor for a menu-annotated pattern.
///
/// Permission for a descriptor follows the router that composed it; the
/// descriptor itself carries presentation data only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntry {
	pub title: String,
	pub icon: Option<String>,
	pub name: Option<String>,
	pub pattern: String,
}

/// One composed menu item: a child router or a pattern descriptor.
#[derive(Debug)]
pub enum MenuItem<'a> {
	Router(&'a Viewset),
	Entry(MenuEntry),
}

impl<'a> MenuItem<'a> {
	pub fn title(&self) -> &str {
		match self {
			MenuItem::Router(viewset) => viewset.title(),
			MenuItem::Entry(entry) => &entry.title,
		}
	}

	pub fn icon(&self) -> Option<&str> {
		match self {
			MenuItem::Router(viewset) => viewset.icon(),
			MenuItem::Entry(entry) => entry.icon.as_deref(),
		}
	}

	pub fn as_router(&self) -> Option<&'a Viewset> {
		match self {
			MenuItem::Router(viewset) => Some(viewset),
			MenuItem::Entry(_) => None,
		}
	}

	pub fn as_entry(&self) -> Option<&MenuEntry> {
		match self {
			MenuItem::Router(_) => None,
			MenuItem::Entry(entry) => Some(entry),
		}
	}
}

/// Composes the menu of `viewset`.
///
/// Child routers come first, in mount order, keeping only those whose
/// definition enables menus. Annotated patterns follow in pattern-list
/// order; a descriptor's title falls back to the humanized pattern name
/// when none was declared.
///
/// # Errors
///
/// Returns a [`ConfigError`](crate::error::ConfigError) when building the
/// router's pattern tree fails.
pub fn compose_menu(viewset: &Viewset) -> ConfigResult<Vec<MenuItem<'_>>> {
	let mut items: Vec<MenuItem<'_>> = viewset
		.children()
		.filter(|route| route.viewset().def().is_menu_enabled())
		.map(|route| MenuItem::Router(route.viewset()))
		.collect();

	let tree = viewset.urls()?;
	for entry in tree.entries() {
		let UrlEntry::Pattern(pattern) = entry else {
			continue;
		};
		if !pattern.is_menu_annotated() {
			continue;
		}
		let title = pattern
			.title()
			.map(str::to_string)
			.unwrap_or_else(|| humanize(pattern.name().unwrap_or_default()));
		items.push(MenuItem::Entry(MenuEntry {
			title,
			icon: pattern.icon().map(str::to_string),
			name: pattern.name().map(str::to_string),
			pattern: pattern.pattern().as_str().to_string(),
		}));
	}
	Ok(items)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use routeset_http::{FnView, Request, Response, View};

	use super::*;
	use crate::builder::{SubDef, ViewsetDef};
	use crate::declaration::{PathDef, RouteDef};

	fn stub_view() -> Arc<dyn View> {
		Arc::new(FnView::new(|_request: Request| async { Ok(Response::ok()) }))
	}

	fn menu_child(name: &str) -> Arc<ViewsetDef> {
		ViewsetDef::builder(name)
			.app_name(name.to_lowercase())
			.menu(true)
			.declare("list_path", PathDef::new("", stub_view()))
			.build()
			.unwrap()
	}

	fn item_titles(items: &[MenuItem<'_>]) -> Vec<String> {
		items.iter().map(|item| item.title().to_string()).collect()
	}

	#[test]
	fn test_children_precede_annotated_patterns() {
		let def = ViewsetDef::builder("DashboardSite")
			.declare("reports", RouteDef::new("reports/", menu_child("ReportsViewset")))
			.declare(
				"help_path",
				PathDef::new("help/", stub_view()).with_title("Help center"),
			)
			.sub(SubDef::new(menu_child("UsersViewset")))
			.build()
			.unwrap();
		let viewset = Viewset::new(&def).unwrap();

		let items = compose_menu(&viewset).unwrap();
		assert_eq!(items.len(), 3);
		assert_eq!(items[0].as_router().unwrap().def().name(), "ReportsViewset");
		assert_eq!(items[1].as_router().unwrap().def().name(), "UsersViewset");
		assert_eq!(items[2].as_entry().unwrap().title, "Help center");
	}

	#[test]
	fn test_menu_disabled_children_are_skipped() {
		let quiet = ViewsetDef::builder("InternalViewset")
			.app_name("internal")
			.declare("list_path", PathDef::new("", stub_view()))
			.build()
			.unwrap();
		let def = ViewsetDef::builder("DashboardSite")
			.declare("internal", RouteDef::new("internal/", quiet))
			.declare("reports", RouteDef::new("reports/", menu_child("ReportsViewset")))
			.build()
			.unwrap();
		let viewset = Viewset::new(&def).unwrap();

		let items = compose_menu(&viewset).unwrap();
		assert_eq!(items.len(), 1);
		assert_eq!(items[0].as_router().unwrap().def().name(), "ReportsViewset");
	}

	#[test]
	fn test_plain_patterns_never_surface() {
		let def = ViewsetDef::builder("PagesViewset")
			.declare("about_path", PathDef::new("about/", stub_view()))
			.declare(
				"faq_path",
				PathDef::new("faq/", stub_view()).with_icon("question"),
			)
			.build()
			.unwrap();
		let viewset = Viewset::new(&def).unwrap();

		let items = compose_menu(&viewset).unwrap();
		assert_eq!(items.len(), 1);
		assert_eq!(items[0].as_entry().unwrap().name.as_deref(), Some("faq"));
	}

	#[test]
	fn test_descriptor_title_defaults_to_humanized_name() {
		let def = ViewsetDef::builder("ReportsViewset")
			.declare(
				"recent_list_path",
				PathDef::new("recent/", stub_view()).with_icon("clock"),
			)
			.build()
			.unwrap();
		let viewset = Viewset::new(&def).unwrap();

		let items = compose_menu(&viewset).unwrap();
		let entry = items[0].as_entry().unwrap();
		assert_eq!(entry.title, "Recent list");
		assert_eq!(entry.icon.as_deref(), Some("clock"));
		assert_eq!(entry.pattern, "recent/");
	}

	#[test]
	fn test_router_items_expose_title_and_icon() {
		let child = ViewsetDef::builder("ReportsViewset")
			.menu(true)
			.title("Reports")
			.icon("chart")
			.build()
			.unwrap();
		let def = ViewsetDef::builder("DashboardSite")
			.declare("reports", RouteDef::new("reports/", child))
			.build()
			.unwrap();
		let viewset = Viewset::new(&def).unwrap();

		let items = compose_menu(&viewset).unwrap();
		assert_eq!(item_titles(&items), ["Reports"]);
		assert_eq!(items[0].icon(), Some("chart"));
	}

	#[test]
	fn test_entries_serialize_for_presentation() {
		let entry = MenuEntry {
			title: "Help center".to_string(),
			icon: Some("life-ring".to_string()),
			name: Some("help".to_string()),
			pattern: "help/".to_string(),
		};
		let json = serde_json::to_value(&entry).unwrap();
		assert_eq!(json["title"], "Help center");
		assert_eq!(json["icon"], "life-ring");
		assert_eq!(json["pattern"], "help/");
	}
}
