//! Namespace scoping and reverse resolution integration tests

use std::sync::Arc;

use routeset::{
	Declared, FnView, PathDef, Request, Response, Reverser, RouteDef, UrlTree, View, Viewset,
	ViewsetDef, clear_urlconf, include, resolve, reverse, set_urlconf,
};
use rstest::rstest;
use serial_test::serial;

fn page() -> Arc<dyn View> {
	Arc::new(FnView::new(|_request: Request| async { Ok(Response::ok()) }))
}

fn shop_def() -> Arc<ViewsetDef> {
	let items = ViewsetDef::builder("ItemsViewset")
		.app_name("items")
		.declare("detail_path", PathDef::new("{pk:int}/", page()))
		.build()
		.unwrap();
	ViewsetDef::builder("ShopViewset")
		.app_name("shop")
		.declare("items", RouteDef::new("items/", items))
		.build()
		.unwrap()
}

/// Routers nested `depth` levels deep, namespaced `ns1` through `ns{depth}`,
/// the innermost declaring a `leaf` pattern.
fn nested(depth: usize) -> Arc<ViewsetDef> {
	let mut def = ViewsetDef::builder(format!("Level{depth}Viewset"))
		.app_name(format!("ns{depth}"))
		.declare("leaf_path", PathDef::new("leaf/", page()))
		.build()
		.unwrap();
	for level in (1..depth).rev() {
		def = ViewsetDef::builder(format!("Level{level}Viewset"))
			.app_name(format!("ns{level}"))
			.declare("child", RouteDef::new("child/", def))
			.build()
			.unwrap();
	}
	def
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn test_namespaced_name_round_trips(#[case] depth: usize) {
	let root = Viewset::new(&nested(depth)).unwrap();
	let tree = root.urls().unwrap();
	let reverser = Reverser::from_tree(&tree);

	let mut segments: Vec<String> = (1..=depth).map(|level| format!("ns{level}")).collect();
	segments.push("leaf".to_string());
	let name = segments.join(":");

	let path = reverser.reverse(&name, &[], &[]).unwrap();
	assert_eq!(path, format!("/{}leaf/", "child/".repeat(depth - 1)));
	assert_eq!(resolve(&tree, &path).unwrap().view_name(), name);
}

#[test]
#[serial(urlconf)]
fn test_reverse_and_resolution_agree_end_to_end() {
	let root = Viewset::new(&shop_def()).unwrap();
	let tree = root.urls().unwrap();
	set_urlconf(tree.clone());

	let from_name = reverse("shop:items:detail", &[], &[("pk", "5")]).unwrap();
	assert_eq!(from_name, "/items/5/");

	// The nested router reverses its own view without spelling the chain,
	// and the composite reaches it through the scoped fallback.
	let child = root.child("items").unwrap().viewset();
	assert_eq!(
		child.reverse("detail", &[], &[("pk", "5")], None).unwrap(),
		from_name
	);
	assert_eq!(
		root.reverse("detail", &[], &[("pk", "5")], None).unwrap(),
		from_name
	);

	let matched = resolve(&tree, &from_name).unwrap();
	assert_eq!(matched.view_name(), "shop:items:detail");
	assert_eq!(matched.kwargs["pk"], "5");
	clear_urlconf();
}

#[test]
#[serial(urlconf)]
fn test_current_app_selects_the_sibling_mount() {
	let goods = ViewsetDef::builder("GoodsViewset")
		.app_name("goods")
		.declare("detail_path", PathDef::new("{pk:int}/", page()))
		.build()
		.unwrap();
	let shop = ViewsetDef::builder("ShopSite")
		.app_name("shop")
		.declare(
			"eu",
			RouteDef::new("eu/", goods.clone())
				.with_override("namespace", Declared::from("eu_goods")),
		)
		.declare(
			"us",
			RouteDef::new("us/", goods).with_override("namespace", Declared::from("us_goods")),
		)
		.build()
		.unwrap();

	let root = Viewset::new(&shop).unwrap();
	set_urlconf(root.urls().unwrap());

	let eu = root.child("eu").unwrap().viewset();
	assert_eq!(
		eu.reverse("detail", &[], &[("pk", "9")], None).unwrap(),
		"/eu/9/"
	);
	assert_eq!(
		eu.reverse("detail", &[], &[("pk", "9")], Some("us_goods"))
			.unwrap(),
		"/us/9/"
	);
	clear_urlconf();
}

#[test]
fn test_parent_namespace_aligns_with_an_outer_mount() {
	let def = ViewsetDef::builder("ShopViewset")
		.app_name("shop")
		.parent_namespace("store")
		.declare("detail_path", PathDef::new("{pk:int}/", page()))
		.build()
		.unwrap();
	let shop = Viewset::new(&def).unwrap();
	let tree = shop.urls().unwrap();

	// The deployment mounts the router under the namespace it promised.
	let outer =
		UrlTree::new(vec![include("", (*tree).clone()).unwrap()]).with_namespace("store");
	let reverser = Reverser::from_tree(&outer);

	let path = shop
		.reverse_with(&reverser, "detail", &[], &[("pk", "3")], None)
		.unwrap();
	assert_eq!(path, "/3/");

	let matched = resolve(&outer, "/3/").unwrap();
	assert_eq!(matched.view_name(), "store:shop:detail");
	assert_eq!(matched.namespaces, ["store", "shop"]);
}

#[test]
fn test_urls_build_once_and_record_parent_links() {
	let root = Viewset::new(&shop_def()).unwrap();
	let first = root.urls().unwrap();
	let second = root.urls().unwrap();
	assert!(Arc::ptr_eq(&first, &second));

	// Mounting during the build recorded the chain down to the child.
	let child = root.child("items").unwrap().viewset();
	assert_eq!(child.scope(), ["shop", "items"]);
}
