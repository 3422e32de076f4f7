//! Router instances.
//!
//! A [`Viewset`] is one configured instance of a [`ViewsetDef`]: the
//! definition's collected tables, with constructor overrides applied, plus a
//! fresh instance of every nested child. Instantiation is eager and
//! recursive, so configuration errors surface at construction, not at
//! request time. The pattern tree is assembled lazily and memoized; a router
//! hands out the same tree for its whole lifetime, which is what makes
//! attaching redirect views and registering reverse entries sound.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use routeset_http::{AuthState, Request};
use routeset_urls::{
	IndexRedirectView, PathPattern, ReverseResult, Reverser, UrlEntry, UrlInclude, UrlPattern,
	UrlTree,
};
use serde_json::{Map, Value as JsonValue};

use crate::builder::{BUILT_IN_KEYS, ViewsetDef, humanize};
use crate::collector::{PATTERN_SUFFIX, PatternSlot};
use crate::declaration::{Declared, Overrides, PathDef, ViewSpec};
use crate::error::{ConfigError, ConfigResult};
use crate::menu::{MenuItem, compose_menu};
use crate::route::Route;
use crate::value::{Kwargs, Value, filter_kwargs};

/// The namespace chain recorded on a child when its parent mounts it:
/// every namespace from the tree root down to and including the parent.
#[derive(Debug, Clone, Default)]
pub struct ParentLink {
	namespaces: Vec<String>,
}

impl ParentLink {
	pub fn new(namespaces: Vec<String>) -> Self {
		Self { namespaces }
	}

	pub fn namespaces(&self) -> &[String] {
		&self.namespaces
	}
}

struct ChildMount {
	name: String,
	route: Route,
}

/// A configured router instance.
///
/// Built from a definition with [`Viewset::new`] or
/// [`Viewset::with_overrides`]. Children declared through route slots or
/// registered sub definitions are instantiated immediately, each with its
/// own state, so sibling mounts of the same definition never interfere.
pub struct Viewset {
	def: Arc<ViewsetDef>,
	attrs: Kwargs,
	slots: IndexMap<String, PatternSlot>,
	slot_children: Vec<ChildMount>,
	sub_children: Vec<ChildMount>,
	consumed_params: Vec<String>,
	parent: OnceCell<ParentLink>,
	urls_memo: OnceCell<Arc<UrlTree>>,
	title_memo: OnceCell<String>,
}

impl Viewset {
	/// Instantiates `def` with no overrides.
	///
	/// # Errors
	///
	/// Returns a [`ConfigError`] when a nested declaration fails to
	/// re-validate during child instantiation.
	pub fn new(def: &Arc<ViewsetDef>) -> ConfigResult<Self> {
		Self::construct(def, &Overrides::new(), Vec::new())
	}

	/// Instantiates `def` with constructor overrides.
	///
	/// Override keys must match a collected declaration or a built-in
	/// configuration key, and must carry the kind their declaration has:
	/// pattern slots take paths, routes, `Unset`, or `Removed`; attributes
	/// take values.
	///
	/// # Errors
	///
	/// [`ConfigError::UnknownOverride`] and [`ConfigError::PrivateOverride`]
	/// for unacceptable keys, [`ConfigError::InvalidOverride`] for kind
	/// mismatches, and pattern errors for override routes that do not parse.
	pub fn with_overrides(def: &Arc<ViewsetDef>, overrides: &Overrides) -> ConfigResult<Self> {
		Self::construct(def, overrides, Vec::new())
	}

	fn construct(
		def: &Arc<ViewsetDef>,
		overrides: &Overrides,
		consumed_params: Vec<String>,
	) -> ConfigResult<Self> {
		def.validate_overrides(overrides)?;

		let mut slots = def.patterns().clone();
		let mut attrs = def.attrs().clone();
		for (key, declared) in overrides {
			if slots.contains_key(key) {
				apply_slot_override(def, &mut slots, key, declared)?;
			} else {
				apply_attr_override(def, &mut attrs, key, declared)?;
			}
		}

		let mut viewset = Self {
			def: Arc::clone(def),
			attrs,
			slots,
			slot_children: Vec::new(),
			sub_children: Vec::new(),
			consumed_params,
			parent: OnceCell::new(),
			urls_memo: OnceCell::new(),
			title_memo: OnceCell::new(),
		};
		viewset.instantiate_children()?;
		Ok(viewset)
	}

	fn instantiate_children(&mut self) -> ConfigResult<()> {
		for (name, slot) in &self.slots {
			let PatternSlot::Route(route_def) = slot else {
				continue;
			};
			let prefix = PathPattern::new(route_def.prefix()).map_err(|source| {
				ConfigError::InvalidPrefix {
					router: self.def.name().to_string(),
					name: name.clone(),
					source,
				}
			})?;
			let mut consumed = self.consumed_params.clone();
			consumed.extend(prefix.param_names().map(str::to_string));
			let child = Self::construct(route_def.child(), route_def.overrides(), consumed)?;
			self.slot_children.push(ChildMount {
				name: name.clone(),
				route: Route::from_parts(prefix, child),
			});
		}

		for sub in self.def.sub_defs() {
			let name = sub
				.name()
				.map(str::to_string)
				.unwrap_or_else(|| sub.def().mount_slug());
			let prefix = PathPattern::new(format!("{name}/")).map_err(|source| {
				ConfigError::InvalidPrefix {
					router: self.def.name().to_string(),
					name: name.clone(),
					source,
				}
			})?;
			let child = Self::construct(sub.def(), sub.overrides(), self.consumed_params.clone())?;
			self.sub_children.push(ChildMount {
				name,
				route: Route::from_parts(prefix, child),
			});
		}
		Ok(())
	}

	pub fn def(&self) -> &Arc<ViewsetDef> {
		&self.def
	}

	/// The instance attributes, after overrides.
	pub fn attrs(&self) -> &Kwargs {
		&self.attrs
	}

	pub fn attr(&self, name: &str) -> Option<&Value> {
		self.attrs.get(name)
	}

	pub fn app_name(&self) -> Option<&str> {
		self.attr("app_name").and_then(Value::as_str)
	}

	pub fn namespace(&self) -> Option<&str> {
		self.attr("namespace").and_then(Value::as_str)
	}

	pub fn parent_namespace(&self) -> Option<&str> {
		self.attr("parent_namespace").and_then(Value::as_str)
	}

	pub fn icon(&self) -> Option<&str> {
		self.attr("icon").and_then(Value::as_str)
	}

	/// The namespace this router scopes its names under: the explicit
	/// `namespace`, falling back to `app_name`.
	pub fn effective_namespace(&self) -> Option<&str> {
		self.namespace().or_else(|| self.app_name())
	}

	/// The display title: the `title` attribute, or the humanized mount
	/// name. Computed once per instance.
	pub fn title(&self) -> &str {
		self.title_memo.get_or_init(|| {
			self.attr("title")
				.and_then(Value::as_str)
				.map(str::to_string)
				.unwrap_or_else(|| humanize(&self.def.mount_slug()))
		})
	}

	/// Parameter names captured by ancestor route prefixes on the way to
	/// this router.
	pub fn consumed_params(&self) -> &[String] {
		&self.consumed_params
	}

	/// Mounted children, route slots first, then registered subs, in
	/// declaration order.
	pub fn children(&self) -> impl Iterator<Item = &Route> {
		self.slot_children
			.iter()
			.chain(&self.sub_children)
			.map(|mount| &mount.route)
	}

	pub fn child(&self, name: &str) -> Option<&Route> {
		self.slot_children
			.iter()
			.chain(&self.sub_children)
			.find(|mount| mount.name == name)
			.map(|mount| &mount.route)
	}

	/// Records the namespace chain under which a parent mounted this
	/// router. Only the first assignment sticks; later ones are logged and
	/// ignored.
	pub fn attach_parent(&self, link: ParentLink) {
		if self.parent_namespace().is_some() {
			tracing::warn!(
				router = self.def.name(),
				"parent_namespace is declared on a nested router; it only applies at the root"
			);
		}
		if self.parent.set(link).is_err() {
			tracing::warn!(
				router = self.def.name(),
				"parent assigned twice; keeping the first assignment"
			);
		}
	}

	/// The full namespace chain of this router, outermost first, including
	/// its own effective namespace. At the root the declared
	/// `parent_namespace`, if any, is the outermost segment.
	pub fn scope(&self) -> Vec<String> {
		let mut scope = match self.parent.get() {
			Some(link) => link.namespaces().to_vec(),
			None => self
				.parent_namespace()
				.map(|ns| vec![ns.to_string()])
				.unwrap_or_default(),
		};
		if let Some(namespace) = self.effective_namespace() {
			scope.push(namespace.to_string());
		}
		scope
	}

	fn scope_with(&self, current_app: Option<&str>) -> Vec<String> {
		let mut scope = self.scope();
		if let Some(app) = current_app {
			match scope.last_mut() {
				Some(last) => *last = app.to_string(),
				None => scope.push(app.to_string()),
			}
		}
		scope
	}

	/// Builds this router's pattern tree.
	///
	/// The tree is computed once and shared afterwards: building mounts
	/// every child (recording parent links as it goes) and wires the index
	/// redirect to the finished tree, so handing out a fresh tree per call
	/// would break both.
	///
	/// # Errors
	///
	/// Returns a [`ConfigError`] when a stored pattern fails to compile.
	pub fn urls(&self) -> ConfigResult<Arc<UrlTree>> {
		self.urls_memo
			.get_or_try_init(|| self.build_urls())
			.cloned()
	}

	fn build_urls(&self) -> ConfigResult<Arc<UrlTree>> {
		let mut entries: Vec<UrlEntry> = Vec::new();
		for raw in self.def.raw_patterns() {
			entries.push(UrlEntry::Pattern(raw.clone()));
		}

		for (name, slot) in &self.slots {
			match slot {
				PatternSlot::Unset => {}
				PatternSlot::Path(path) => {
					entries.push(UrlEntry::Pattern(self.build_path_entry(name, path)?));
				}
				PatternSlot::Route(_) => {
					if let Some(mount) =
						self.slot_children.iter().find(|mount| mount.name == *name)
					{
						entries.push(self.mount_child(&mount.route)?);
					}
				}
			}
		}
		for mount in &self.sub_children {
			entries.push(self.mount_child(&mount.route)?);
		}

		let mut index_view = None;
		if self.def.has_index_redirect() {
			let view = Arc::new(IndexRedirectView::new());
			let pattern =
				PathPattern::new("").map_err(|source| ConfigError::InvalidPattern {
					router: self.def.name().to_string(),
					name: "index".to_string(),
					source,
				})?;
			entries.push(UrlEntry::Pattern(
				UrlPattern::from_pattern(pattern, view.clone())
					.with_name("index")
					.mark_index_redirect(),
			));
			index_view = Some(view);
		}

		let mut tree = UrlTree::new(entries);
		if let Some(app_name) = self.app_name() {
			tree = tree.with_app_name(app_name);
		}
		if let Some(namespace) = self.namespace() {
			tree = tree.with_namespace(namespace);
		}
		let tree = Arc::new(tree);
		if let Some(view) = index_view {
			view.attach(&tree);
		}
		Ok(tree)
	}

	fn mount_child(&self, route: &Route) -> ConfigResult<UrlEntry> {
		route.viewset().attach_parent(ParentLink::new(self.scope()));
		let tree = route.viewset().urls()?;
		Ok(UrlEntry::Include(UrlInclude::from_pattern(
			route.prefix().clone(),
			(*tree).clone(),
		)))
	}

	fn build_path_entry(&self, slot_name: &str, path: &PathDef) -> ConfigResult<UrlPattern> {
		let pattern =
			PathPattern::new(path.route()).map_err(|source| ConfigError::InvalidPattern {
				router: self.def.name().to_string(),
				name: slot_name.to_string(),
				source,
			})?;
		let view = match path.view_spec() {
			ViewSpec::Instance(view) => view.clone(),
			ViewSpec::Factory(factory) => {
				let kwargs = filter_kwargs(&factory.accepted_kwargs(), &self.attrs);
				factory.build(&kwargs)
			}
		};

		let mut entry = UrlPattern::from_pattern(pattern, view);
		let name = path
			.name()
			.map(str::to_string)
			.or_else(|| default_pattern_name(slot_name));
		if let Some(name) = name {
			entry = entry.with_name(name);
		}
		if let Some(title) = path.title() {
			entry = entry.with_title(title);
		}
		if let Some(icon) = path.icon() {
			entry = entry.with_icon(icon);
		}
		for (key, value) in path.extras() {
			entry = entry.with_extra(key.clone(), value.clone());
		}
		Ok(entry)
	}

	/// Reverses `name` against the registered root urlconf, scoped to this
	/// router's namespace chain.
	///
	/// The scoped lookup tries `scope:name` exactly, then descends into
	/// nested namespaces under the scope; see
	/// [`Reverser::reverse_in_scope`]. `current_app` substitutes the
	/// deepest scope segment, selecting between sibling mounts of the same
	/// definition.
	///
	/// # Errors
	///
	/// [`routeset_urls::ReverseError`] when no root is registered or no
	/// registered name qualifies.
	pub fn reverse(
		&self,
		name: &str,
		args: &[&str],
		kwargs: &[(&str, &str)],
		current_app: Option<&str>,
	) -> ReverseResult<String> {
		let scope = self.scope_with(current_app);
		let scope_refs: Vec<&str> = scope.iter().map(String::as_str).collect();
		routeset_urls::reverse_scoped(&scope_refs, name, args, kwargs)
	}

	/// Like [`reverse`](Self::reverse), against an explicit reverser
	/// instead of the process-wide one.
	///
	/// # Errors
	///
	/// [`routeset_urls::ReverseError::NoReverseMatch`] when no registered
	/// name qualifies.
	pub fn reverse_with(
		&self,
		reverser: &Reverser,
		name: &str,
		args: &[&str],
		kwargs: &[(&str, &str)],
		current_app: Option<&str>,
	) -> ReverseResult<String> {
		let scope = self.scope_with(current_app);
		let scope_refs: Vec<&str> = scope.iter().map(String::as_str).collect();
		reverser.reverse_in_scope(&scope_refs, name, args, kwargs)
	}

	/// Whether the authenticated principal may view pages of this router.
	/// Delegates to the nearest declared permission policy; the default
	/// allows everyone.
	pub fn has_view_permission(&self, auth: &AuthState, obj: Option<&JsonValue>) -> bool {
		self.def.permission().has_view_permission(auth, obj)
	}

	/// Extra template context contributed by this router, empty unless a
	/// provider is declared.
	pub fn get_context_data(&self, request: &Request) -> Map<String, JsonValue> {
		self.def
			.context_provider()
			.map(|provider| provider.get_context_data(self, request))
			.unwrap_or_default()
	}

	/// The instance attributes a handler accepts, minus unset ones.
	pub fn handler_kwargs(&self, accepted: &[&str]) -> Kwargs {
		filter_kwargs(accepted, &self.attrs)
	}

	/// Composes this router's menu; see [`compose_menu`].
	///
	/// # Errors
	///
	/// Returns a [`ConfigError`] when building the pattern tree fails.
	pub fn menu_items(&self) -> ConfigResult<Vec<MenuItem<'_>>> {
		compose_menu(self)
	}

	/// Finds the router in this instance tree that owns a match, given the
	/// match's namespace chain (outermost first).
	///
	/// Children mounted without a namespace contribute no segment, so their
	/// matches attribute to the nearest namespaced ancestor.
	pub fn resolve_owner(&self, namespaces: &[String]) -> Option<&Viewset> {
		let remaining = match self.effective_namespace() {
			Some(own) => match namespaces.split_first() {
				Some((first, rest)) if first == own => rest,
				_ => return None,
			},
			None => namespaces,
		};
		if remaining.is_empty() {
			return Some(self);
		}
		self.children()
			.find_map(|route| route.viewset().resolve_owner(remaining))
	}
}

impl fmt::Debug for Viewset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Viewset")
			.field("def", &self.def.name())
			.field("attrs", &self.attrs.keys().collect::<Vec<_>>())
			.field(
				"children",
				&(self.slot_children.len() + self.sub_children.len()),
			)
			.finish()
	}
}

fn apply_slot_override(
	def: &ViewsetDef,
	slots: &mut IndexMap<String, PatternSlot>,
	key: &str,
	declared: &Declared,
) -> ConfigResult<()> {
	match declared {
		Declared::Path(path) => {
			PathPattern::new(path.route()).map_err(|source| ConfigError::InvalidPattern {
				router: def.name().to_string(),
				name: key.to_string(),
				source,
			})?;
			slots.insert(key.to_string(), PatternSlot::Path(path.clone()));
		}
		Declared::Route(route) => {
			PathPattern::new(route.prefix()).map_err(|source| ConfigError::InvalidPrefix {
				router: def.name().to_string(),
				name: key.to_string(),
				source,
			})?;
			route.child().validate_overrides(route.overrides())?;
			slots.insert(key.to_string(), PatternSlot::Route(route.clone()));
		}
		Declared::Unset => {
			slots.insert(key.to_string(), PatternSlot::Unset);
		}
		Declared::Removed => {
			slots.shift_remove(key);
		}
		Declared::Value(_) => {
			return Err(ConfigError::InvalidOverride {
				router: def.name().to_string(),
				key: key.to_string(),
			});
		}
	}
	Ok(())
}

fn apply_attr_override(
	def: &ViewsetDef,
	attrs: &mut Kwargs,
	key: &str,
	declared: &Declared,
) -> ConfigResult<()> {
	match declared {
		Declared::Value(value) => {
			let string_required = BUILT_IN_KEYS.contains(&key);
			if string_required && value.as_str().is_none() && !value.is_unset() {
				return Err(ConfigError::InvalidOverride {
					router: def.name().to_string(),
					key: key.to_string(),
				});
			}
			attrs.insert(key.to_string(), value.clone());
		}
		Declared::Unset => {
			attrs.insert(key.to_string(), Value::Unset);
		}
		Declared::Removed => {
			attrs.shift_remove(key);
		}
		Declared::Path(_) | Declared::Route(_) => {
			return Err(ConfigError::InvalidOverride {
				router: def.name().to_string(),
				key: key.to_string(),
			});
		}
	}
	Ok(())
}

fn default_pattern_name(slot_name: &str) -> Option<String> {
	slot_name
		.strip_suffix(PATTERN_SUFFIX)
		.filter(|stem| !stem.is_empty())
		.map(str::to_string)
}
