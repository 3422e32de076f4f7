//! Inheritance linearization and declaration collection.
//!
//! A definition's effective tables are computed in two steps. First the base
//! list is linearized with the C3 algorithm, so diamonds resolve the same
//! way every time and ambiguous base orders are rejected. Then declarations
//! are folded most-base first, finishing with the definition's own, into two
//! ordered tables: pattern slots and plain attributes. Later declarations
//! overwrite earlier ones in place, so an inherited name keeps its position
//! unless it is removed and declared again, which appends it at the end.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::builder::ViewsetDef;
use crate::declaration::{Declared, PathDef, RouteDef};
use crate::error::{ConfigError, ConfigResult};
use crate::value::{Kwargs, Value};

pub(crate) const PATTERN_SUFFIX: &str = "_path";
const GETTER_PREFIX: &str = "get_";

/// A collected pattern declaration: a stored path, a nested route, or a
/// reserved slot with no value yet.
#[derive(Debug, Clone)]
pub enum PatternSlot {
	Path(PathDef),
	Route(RouteDef),
	Unset,
}

impl PatternSlot {
	pub fn is_unset(&self) -> bool {
		matches!(self, PatternSlot::Unset)
	}
}

/// Whether a declaration name addresses the pattern table.
///
/// Names ending in `_path` do, unless they carry the `get_` getter prefix.
/// Route declarations are exempt: they are recognized by value under any
/// non-getter name.
pub fn is_pattern_name(name: &str) -> bool {
	name.ends_with(PATTERN_SUFFIX) && !name.starts_with(GETTER_PREFIX)
}

/// Linearizes a base list with C3.
///
/// The result covers the bases and all their ancestors, most derived first,
/// and does not include the definition being built. Definitions are compared
/// by identity, so the same definition reached through two bases merges into
/// one entry.
///
/// # Errors
///
/// Returns [`ConfigError::LinearizationConflict`] when the base lists
/// disagree on an order, for example when two bases inherit a shared pair of
/// ancestors in opposite orders.
pub fn linearize(name: &str, bases: &[Arc<ViewsetDef>]) -> ConfigResult<Vec<Arc<ViewsetDef>>> {
	let mut sequences: Vec<Vec<Arc<ViewsetDef>>> = bases
		.iter()
		.map(|base| {
			let mut sequence = Vec::with_capacity(1 + base.lin().len());
			sequence.push(Arc::clone(base));
			sequence.extend(base.lin().iter().cloned());
			sequence
		})
		.collect();
	sequences.push(bases.to_vec());

	let mut merged = Vec::new();
	loop {
		sequences.retain(|sequence| !sequence.is_empty());
		if sequences.is_empty() {
			return Ok(merged);
		}

		let head = sequences.iter().find_map(|sequence| {
			let candidate = &sequence[0];
			let in_some_tail = sequences
				.iter()
				.any(|other| other[1..].iter().any(|def| Arc::ptr_eq(def, candidate)));
			(!in_some_tail).then(|| Arc::clone(candidate))
		});
		let Some(head) = head else {
			return Err(ConfigError::LinearizationConflict {
				router: name.to_string(),
			});
		};

		for sequence in &mut sequences {
			if Arc::ptr_eq(&sequence[0], &head) {
				sequence.remove(0);
			}
		}
		merged.push(head);
	}
}

/// Folds declarations along a linearization into the two effective tables.
///
/// Ancestors are applied most-base first, the definition's own declarations
/// last, so nearer declarations win. Each declaration claims its name in
/// exactly one table and evicts it from the other, and `Removed` evicts it
/// from both.
pub fn collect(
	own: &IndexMap<String, Declared>,
	lin: &[Arc<ViewsetDef>],
) -> (IndexMap<String, PatternSlot>, Kwargs) {
	let mut patterns = IndexMap::new();
	let mut attrs = Kwargs::new();

	for def in lin.iter().rev() {
		merge_declarations(def.own_declarations(), &mut patterns, &mut attrs);
	}
	merge_declarations(own, &mut patterns, &mut attrs);

	(patterns, attrs)
}

fn merge_declarations(
	declarations: &IndexMap<String, Declared>,
	patterns: &mut IndexMap<String, PatternSlot>,
	attrs: &mut Kwargs,
) {
	for (name, declared) in declarations {
		match declared {
			Declared::Removed => {
				patterns.shift_remove(name);
				attrs.shift_remove(name);
			}
			Declared::Route(route) if !name.starts_with(GETTER_PREFIX) => {
				attrs.shift_remove(name);
				patterns.insert(name.clone(), PatternSlot::Route(route.clone()));
			}
			Declared::Path(path) if is_pattern_name(name) => {
				attrs.shift_remove(name);
				patterns.insert(name.clone(), PatternSlot::Path(path.clone()));
			}
			Declared::Unset if is_pattern_name(name) => {
				attrs.shift_remove(name);
				patterns.insert(name.clone(), PatternSlot::Unset);
			}
			Declared::Value(value) => {
				if is_pattern_name(name) {
					tracing::debug!(
						name,
						"pattern-suffixed name holds a plain value; treating it as an attribute"
					);
				}
				patterns.shift_remove(name);
				attrs.insert(name.clone(), value.clone());
			}
			Declared::Unset => {
				patterns.shift_remove(name);
				attrs.insert(name.clone(), Value::Unset);
			}
			Declared::Path(_) => {
				tracing::debug!(name, "path declared under a non-pattern name is ignored");
			}
			Declared::Route(_) => {
				tracing::debug!(name, "route declared under a getter name is ignored");
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use routeset_http::{FnView, Request, Response, View};

	use super::*;
	use crate::builder::ViewsetDef;

	fn stub_view() -> Arc<dyn View> {
		Arc::new(FnView::new(|_request: Request| async { Ok(Response::ok()) }))
	}

	fn names(defs: &[Arc<ViewsetDef>]) -> Vec<&str> {
		defs.iter().map(|def| def.name()).collect()
	}

	#[test]
	fn test_is_pattern_name_requires_suffix_and_rejects_getters() {
		assert!(is_pattern_name("list_path"));
		assert!(is_pattern_name("_path"));
		assert!(!is_pattern_name("list"));
		assert!(!is_pattern_name("get_list_path"));
	}

	#[test]
	fn test_diamond_linearizes_left_to_right_then_root() {
		let a = ViewsetDef::builder("A").build().unwrap();
		let b = ViewsetDef::builder("B").extends(&a).build().unwrap();
		let c = ViewsetDef::builder("C").extends(&a).build().unwrap();
		let d = ViewsetDef::builder("D")
			.extends(&b)
			.extends(&c)
			.build()
			.unwrap();

		assert_eq!(names(d.lin()), ["B", "C", "A"]);
	}

	#[test]
	fn test_contradictory_base_orders_are_rejected() {
		let x = ViewsetDef::builder("X").build().unwrap();
		let y = ViewsetDef::builder("Y").build().unwrap();
		let e = ViewsetDef::builder("E")
			.extends(&x)
			.extends(&y)
			.build()
			.unwrap();
		let f = ViewsetDef::builder("F")
			.extends(&y)
			.extends(&x)
			.build()
			.unwrap();

		let err = ViewsetDef::builder("G")
			.extends(&e)
			.extends(&f)
			.build()
			.unwrap_err();
		assert!(matches!(
			err,
			ConfigError::LinearizationConflict { router } if router == "G"
		));
	}

	#[test]
	fn test_shared_base_collapses_to_one_entry() {
		let root = ViewsetDef::builder("Root").build().unwrap();
		let left = ViewsetDef::builder("Left").extends(&root).build().unwrap();
		let right = ViewsetDef::builder("Right").extends(&root).build().unwrap();
		let leaf = ViewsetDef::builder("Leaf")
			.extends(&left)
			.extends(&right)
			.build()
			.unwrap();

		let root_entries = leaf
			.lin()
			.iter()
			.filter(|def| Arc::ptr_eq(def, &root))
			.count();
		assert_eq!(root_entries, 1);
	}

	#[test]
	fn test_override_keeps_inherited_position() {
		let base = ViewsetDef::builder("Base")
			.declare("list_path", PathDef::new("", stub_view()))
			.declare("detail_path", PathDef::new("{pk:int}/", stub_view()))
			.build()
			.unwrap();
		let leaf = ViewsetDef::builder("Leaf")
			.extends(&base)
			.declare("list_path", PathDef::new("all/", stub_view()))
			.build()
			.unwrap();

		let keys: Vec<&str> = leaf.patterns().keys().map(String::as_str).collect();
		assert_eq!(keys, ["list_path", "detail_path"]);
		match &leaf.patterns()["list_path"] {
			PatternSlot::Path(path) => assert_eq!(path.route(), "all/"),
			other => panic!("expected a path slot, got {other:?}"),
		}
	}

	#[test]
	fn test_removal_drops_name_and_redeclaring_appends_at_end() {
		let base = ViewsetDef::builder("Base")
			.declare("a_path", PathDef::new("a/", stub_view()))
			.declare("b_path", PathDef::new("b/", stub_view()))
			.declare("c_path", PathDef::new("c/", stub_view()))
			.build()
			.unwrap();
		let trimmed = ViewsetDef::builder("Trimmed")
			.extends(&base)
			.remove("b_path")
			.build()
			.unwrap();
		let keys: Vec<&str> = trimmed.patterns().keys().map(String::as_str).collect();
		assert_eq!(keys, ["a_path", "c_path"]);

		let restored = ViewsetDef::builder("Restored")
			.extends(&trimmed)
			.declare("b_path", PathDef::new("b2/", stub_view()))
			.build()
			.unwrap();
		let keys: Vec<&str> = restored.patterns().keys().map(String::as_str).collect();
		assert_eq!(keys, ["a_path", "c_path", "b_path"]);
	}

	#[test]
	fn test_value_under_pattern_name_moves_to_attributes() {
		let base = ViewsetDef::builder("Base")
			.declare("archive_path", PathDef::new("archive/", stub_view()))
			.build()
			.unwrap();
		let leaf = ViewsetDef::builder("Leaf")
			.extends(&base)
			.declare("archive_path", "disabled")
			.build()
			.unwrap();

		assert!(!leaf.patterns().contains_key("archive_path"));
		assert_eq!(
			leaf.attrs().get("archive_path"),
			Some(&Value::from("disabled"))
		);
	}

	#[test]
	fn test_route_collects_under_any_non_getter_name() {
		let child = ViewsetDef::builder("Child").build().unwrap();
		let def = ViewsetDef::builder("Parent")
			.declare("r", RouteDef::new("items/", child.clone()))
			.declare("get_r", RouteDef::new("ignored/", child))
			.build()
			.unwrap();

		assert!(matches!(def.patterns().get("r"), Some(PatternSlot::Route(_))));
		assert!(!def.patterns().contains_key("get_r"));
	}

	#[test]
	fn test_getter_named_path_is_never_collected() {
		let def = ViewsetDef::builder("Owner")
			.declare("get_absolute_path", PathDef::new("abs/", stub_view()))
			.build()
			.unwrap();

		assert!(def.patterns().is_empty());
		assert!(def.attrs().is_empty());
	}

	#[test]
	fn test_unset_reserves_a_pattern_slot() {
		let base = ViewsetDef::builder("Base")
			.declare_unset("extra_path")
			.build()
			.unwrap();

		assert!(matches!(
			base.patterns().get("extra_path"),
			Some(PatternSlot::Unset)
		));
	}

	#[test]
	fn test_empty_definition_yields_empty_tables() {
		let def = ViewsetDef::builder("Empty").build().unwrap();
		assert!(def.patterns().is_empty());
		assert!(def.attrs().is_empty());
		assert!(def.lin().is_empty());
	}
}
