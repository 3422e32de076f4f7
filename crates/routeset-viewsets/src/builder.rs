//! Router definitions and their builder.
//!
//! A [`ViewsetDef`] is the immutable, shareable blueprint of a router: its
//! declarations, bases, and capability flags. Definitions are assembled with
//! [`ViewsetDefBuilder`], which linearizes the bases, folds the declaration
//! tables, and validates every stored pattern and nested override before
//! anything is instantiated. Instances are built from a definition with
//! [`Viewset::new`](crate::viewset::Viewset::new).

use std::fmt;
use std::iter;
use std::sync::Arc;

use indexmap::IndexMap;
use routeset_urls::{PathPattern, UrlPattern};

use crate::collector::{PatternSlot, collect, linearize};
use crate::declaration::{AllowAll, ContextProvider, Declared, Overrides, ViewPermission};
use crate::error::{ConfigError, ConfigResult};
use crate::value::Kwargs;

/// Configuration keys every router accepts even without a declaration.
pub const BUILT_IN_KEYS: [&str; 5] = ["app_name", "namespace", "parent_namespace", "title", "icon"];

const MOUNT_SUFFIXES: [&str; 4] = ["ViewSet", "Viewset", "Application", "Site"];

/// A child definition registered for automatic mounting.
///
/// Registered children are mounted after the declared patterns, under
/// `{name}/` where `name` defaults to the child's
/// [`mount_slug`](ViewsetDef::mount_slug).
#[derive(Clone)]
pub struct SubDef {
	def: Arc<ViewsetDef>,
	name: Option<String>,
	overrides: Overrides,
}

impl SubDef {
	pub fn new(def: Arc<ViewsetDef>) -> Self {
		Self {
			def,
			name: None,
			overrides: Overrides::new(),
		}
	}

	/// Mounts the child under this name instead of the derived one.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_override(mut self, key: impl Into<String>, value: impl Into<Declared>) -> Self {
		self.overrides.insert(key.into(), value.into());
		self
	}

	pub fn def(&self) -> &Arc<ViewsetDef> {
		&self.def
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn overrides(&self) -> &Overrides {
		&self.overrides
	}
}

impl fmt::Debug for SubDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubDef")
			.field("def", &self.def.name())
			.field("name", &self.name)
			.finish()
	}
}

/// An immutable router blueprint.
///
/// Definitions form an inheritance graph through their bases. The effective
/// pattern and attribute tables are computed once, at build time, so every
/// instance constructed from the definition starts from the same collected
/// state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use routeset_http::{FnView, Request, Response};
/// use routeset_viewsets::{PathDef, ViewsetDef};
///
/// # fn main() -> routeset_viewsets::ConfigResult<()> {
/// let view = Arc::new(FnView::new(|_request: Request| async {
///     Ok(Response::ok())
/// }));
/// let articles = ViewsetDef::builder("ArticlesViewset")
///     .app_name("articles")
///     .declare("list_path", PathDef::new("", view))
///     .build()?;
/// assert_eq!(articles.mount_slug(), "articles");
/// # Ok(())
/// # }
/// ```
pub struct ViewsetDef {
	name: String,
	bases: Vec<Arc<ViewsetDef>>,
	lin: Vec<Arc<ViewsetDef>>,
	own: IndexMap<String, Declared>,
	menu: Option<bool>,
	index_redirect: Option<bool>,
	permission: Option<Arc<dyn ViewPermission>>,
	context: Option<Arc<dyn ContextProvider>>,
	sub_defs: Option<Vec<SubDef>>,
	raw_patterns: Option<Vec<UrlPattern>>,
	patterns: IndexMap<String, PatternSlot>,
	attrs: Kwargs,
}

impl ViewsetDef {
	pub fn builder(name: impl Into<String>) -> ViewsetDefBuilder {
		ViewsetDefBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn bases(&self) -> &[Arc<ViewsetDef>] {
		&self.bases
	}

	/// The linearized ancestry, most derived first, excluding this
	/// definition.
	pub(crate) fn lin(&self) -> &[Arc<ViewsetDef>] {
		&self.lin
	}

	pub(crate) fn own_declarations(&self) -> &IndexMap<String, Declared> {
		&self.own
	}

	/// The collected pattern slots, in declaration order.
	pub fn patterns(&self) -> &IndexMap<String, PatternSlot> {
		&self.patterns
	}

	/// The collected plain attributes, in declaration order.
	pub fn attrs(&self) -> &Kwargs {
		&self.attrs
	}

	fn chain(&self) -> impl Iterator<Item = &ViewsetDef> {
		iter::once(self).chain(self.lin.iter().map(Arc::as_ref))
	}

	/// Whether this router contributes an entry to its parent's menu.
	/// Resolved along the ancestry, nearest setting wins, off by default.
	pub fn is_menu_enabled(&self) -> bool {
		self.chain().find_map(|def| def.menu).unwrap_or(false)
	}

	/// Whether an index redirect is appended to this router's patterns.
	/// Resolved along the ancestry, nearest setting wins, off by default.
	pub fn has_index_redirect(&self) -> bool {
		self.chain()
			.find_map(|def| def.index_redirect)
			.unwrap_or(false)
	}

	/// The nearest declared permission policy, or [`AllowAll`].
	pub fn permission(&self) -> Arc<dyn ViewPermission> {
		self.chain()
			.find_map(|def| def.permission.clone())
			.unwrap_or_else(|| Arc::new(AllowAll))
	}

	/// The nearest declared context provider, if any.
	pub fn context_provider(&self) -> Option<Arc<dyn ContextProvider>> {
		self.chain().find_map(|def| def.context.clone())
	}

	/// The nearest registered child list. Registration does not accumulate
	/// across the ancestry; the nearest list shadows the rest.
	pub fn sub_defs(&self) -> &[SubDef] {
		self.chain()
			.find_map(|def| def.sub_defs.as_deref())
			.unwrap_or(&[])
	}

	/// The nearest raw pattern list, mounted ahead of declared patterns.
	pub fn raw_patterns(&self) -> &[UrlPattern] {
		self.chain()
			.find_map(|def| def.raw_patterns.as_deref())
			.unwrap_or(&[])
	}

	/// The URL segment this definition mounts under when auto-named:
	/// the name with a router suffix stripped, converted to snake case.
	pub fn mount_slug(&self) -> String {
		derive_mount_name(&self.name)
	}

	/// Checks constructor overrides against this definition.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::PrivateOverride`] for keys with a leading
	/// underscore and [`ConfigError::UnknownOverride`] for keys that match
	/// neither a collected declaration nor a built-in configuration key.
	pub fn validate_overrides(&self, overrides: &Overrides) -> ConfigResult<()> {
		for key in overrides.keys() {
			if key.starts_with('_') {
				return Err(ConfigError::PrivateOverride {
					router: self.name.clone(),
					key: key.clone(),
				});
			}
			let known = self.patterns.contains_key(key)
				|| self.attrs.contains_key(key)
				|| BUILT_IN_KEYS.contains(&key.as_str());
			if !known {
				return Err(ConfigError::UnknownOverride {
					router: self.name.clone(),
					key: key.clone(),
				});
			}
		}
		Ok(())
	}
}

impl fmt::Debug for ViewsetDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewsetDef")
			.field("name", &self.name)
			.field(
				"bases",
				&self.bases.iter().map(|base| base.name()).collect::<Vec<_>>(),
			)
			.field("patterns", &self.patterns.keys().collect::<Vec<_>>())
			.field("attrs", &self.attrs.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Derives the mount segment for a router name.
pub(crate) fn derive_mount_name(name: &str) -> String {
	let stem = MOUNT_SUFFIXES
		.iter()
		.find_map(|suffix| name.strip_suffix(suffix).filter(|stem| !stem.is_empty()))
		.unwrap_or(name);

	let mut slug = String::with_capacity(stem.len() + 2);
	let mut prev_lower = false;
	for ch in stem.chars() {
		if ch.is_uppercase() {
			if prev_lower {
				slug.push('_');
			}
			slug.extend(ch.to_lowercase());
			prev_lower = false;
		} else {
			slug.push(ch);
			prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
		}
	}
	slug
}

/// Turns an identifier into a display title: underscores become spaces and
/// the first letter is capitalized.
pub(crate) fn humanize(name: &str) -> String {
	let spaced = name.replace('_', " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => spaced,
	}
}

/// Assembles a [`ViewsetDef`].
///
/// Declarations are recorded in call order; [`build`](Self::build) runs
/// linearization, collection, and validation in one pass.
pub struct ViewsetDefBuilder {
	name: String,
	bases: Vec<Arc<ViewsetDef>>,
	own: IndexMap<String, Declared>,
	menu: Option<bool>,
	index_redirect: Option<bool>,
	permission: Option<Arc<dyn ViewPermission>>,
	context: Option<Arc<dyn ContextProvider>>,
	sub_defs: Option<Vec<SubDef>>,
	raw_patterns: Option<Vec<UrlPattern>>,
}

impl ViewsetDefBuilder {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			bases: Vec::new(),
			own: IndexMap::new(),
			menu: None,
			index_redirect: None,
			permission: None,
			context: None,
			sub_defs: None,
			raw_patterns: None,
		}
	}

	/// Adds a base definition. Base order matters: earlier bases win when
	/// the linearization has a choice.
	pub fn extends(mut self, base: &Arc<ViewsetDef>) -> Self {
		self.bases.push(Arc::clone(base));
		self
	}

	/// Records a declaration under `name`.
	pub fn declare(mut self, name: impl Into<String>, value: impl Into<Declared>) -> Self {
		self.own.insert(name.into(), value.into());
		self
	}

	/// Reserves `name` with no value, so instances can fill it later.
	pub fn declare_unset(mut self, name: impl Into<String>) -> Self {
		self.own.insert(name.into(), Declared::Unset);
		self
	}

	/// Withdraws an inherited declaration.
	pub fn remove(mut self, name: impl Into<String>) -> Self {
		self.own.insert(name.into(), Declared::Removed);
		self
	}

	pub fn app_name(self, app_name: impl Into<String>) -> Self {
		self.declare("app_name", app_name.into())
	}

	pub fn namespace(self, namespace: impl Into<String>) -> Self {
		self.declare("namespace", namespace.into())
	}

	/// Declares the namespace prepended when this router is the root of the
	/// mounted tree. Ignored, with a warning, on routers that end up nested.
	pub fn parent_namespace(self, parent_namespace: impl Into<String>) -> Self {
		self.declare("parent_namespace", parent_namespace.into())
	}

	pub fn title(self, title: impl Into<String>) -> Self {
		self.declare("title", title.into())
	}

	pub fn icon(self, icon: impl Into<String>) -> Self {
		self.declare("icon", icon.into())
	}

	/// Marks this router as contributing an entry to its parent's menu.
	pub fn menu(mut self, enabled: bool) -> Self {
		self.menu = Some(enabled);
		self
	}

	/// Appends an index redirect pattern after all other patterns.
	pub fn index_redirect(mut self, enabled: bool) -> Self {
		self.index_redirect = Some(enabled);
		self
	}

	pub fn permission(mut self, permission: Arc<dyn ViewPermission>) -> Self {
		self.permission = Some(permission);
		self
	}

	pub fn context(mut self, context: Arc<dyn ContextProvider>) -> Self {
		self.context = Some(context);
		self
	}

	/// Registers a child definition for automatic mounting.
	pub fn sub(mut self, sub: SubDef) -> Self {
		self.sub_defs.get_or_insert_with(Vec::new).push(sub);
		self
	}

	/// Adds a raw pattern mounted ahead of the declared ones.
	pub fn raw_pattern(mut self, pattern: UrlPattern) -> Self {
		self.raw_patterns.get_or_insert_with(Vec::new).push(pattern);
		self
	}

	/// Linearizes, collects, validates, and freezes the definition.
	///
	/// # Errors
	///
	/// Returns a [`ConfigError`] when the bases cannot be linearized, a
	/// declared pattern or route prefix does not parse, or a nested override
	/// does not match the child definition.
	pub fn build(self) -> ConfigResult<Arc<ViewsetDef>> {
		let lin = linearize(&self.name, &self.bases)?;
		let (patterns, attrs) = collect(&self.own, &lin);

		for (slot_name, slot) in &patterns {
			match slot {
				PatternSlot::Path(path) => {
					PathPattern::new(path.route()).map_err(|source| {
						ConfigError::InvalidPattern {
							router: self.name.clone(),
							name: slot_name.clone(),
							source,
						}
					})?;
				}
				PatternSlot::Route(route) => {
					PathPattern::new(route.prefix()).map_err(|source| {
						ConfigError::InvalidPrefix {
							router: self.name.clone(),
							name: slot_name.clone(),
							source,
						}
					})?;
					route.child().validate_overrides(route.overrides())?;
				}
				PatternSlot::Unset => {}
			}
		}
		if let Some(sub_defs) = &self.sub_defs {
			for sub in sub_defs {
				sub.def().validate_overrides(sub.overrides())?;
			}
		}

		Ok(Arc::new(ViewsetDef {
			name: self.name,
			bases: self.bases,
			lin,
			own: self.own,
			menu: self.menu,
			index_redirect: self.index_redirect,
			permission: self.permission,
			context: self.context,
			sub_defs: self.sub_defs,
			raw_patterns: self.raw_patterns,
			patterns,
			attrs,
		}))
	}
}
