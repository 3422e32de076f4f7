//! Reverse URL lookup.
//!
//! A [`Reverser`] is built by walking a [`UrlTree`] once: every named pattern
//! is indexed under its fully namespaced name (`shop:items:detail`) together
//! with the concatenated route template and the parameter specs collected
//! along the prefix chain. Reversing substitutes caller-supplied values into
//! the template after validating each against its converter.
//!
//! Single-parameter templates take a direct replace; multi-parameter
//! templates go through an Aho-Corasick pass so every placeholder token is
//! substituted in one scan.

use aho_corasick::AhoCorasick;
use indexmap::IndexMap;
use thiserror::Error as ThisError;

use crate::entry::{UrlEntry, UrlTree};
use crate::pattern::ParamSpec;

#[derive(Debug, Clone, ThisError)]
pub enum ReverseError {
	#[error("Reverse for {name:?} not found")]
	NoReverseMatch { name: String },

	#[error("Reverse for {name:?} is missing a value for parameter {param:?}")]
	MissingParam { name: String, param: String },

	#[error(
		"Reverse for {name:?} got {value:?} for parameter {param:?}, which the {converter:?} converter rejects"
	)]
	InvalidParam {
		name: String,
		param: String,
		value: String,
		converter: &'static str,
	},

	#[error("Reverse for {name:?} got more positional arguments than parameters")]
	ExtraArgs { name: String },

	#[error("No urlconf registered; call set_urlconf() before reversing")]
	NoUrlconf,

	#[error("Reverse substitution for {name:?} failed: {reason}")]
	Substitution { name: String, reason: String },
}

pub type ReverseResult<T> = Result<T, ReverseError>;

#[derive(Debug, Clone)]
struct ReverseEntry {
	template: String,
	params: Vec<ParamSpec>,
}

/// Index of fully namespaced names to route templates.
///
/// Entries keep registration order, which makes the scoped lookup in
/// [`reverse_in_scope`](Reverser::reverse_in_scope) deterministic.
#[derive(Debug, Default)]
pub struct Reverser {
	entries: IndexMap<String, ReverseEntry>,
}

impl Reverser {
	/// Walks a tree and indexes every named pattern. With two patterns under
	/// the same full name, the first in resolution order is kept, mirroring
	/// forward matching.
	pub fn from_tree(tree: &UrlTree) -> Self {
		let mut reverser = Self::default();
		let mut namespaces: Vec<String> = Vec::new();
		if let Some(namespace) = tree.effective_namespace() {
			namespaces.push(namespace.to_string());
		}
		reverser.collect(tree, "", &[], &mut namespaces);
		reverser
	}

	fn collect(
		&mut self,
		tree: &UrlTree,
		prefix: &str,
		prefix_params: &[ParamSpec],
		namespaces: &mut Vec<String>,
	) {
		for entry in tree.entries() {
			match entry {
				UrlEntry::Pattern(pattern) => {
					let Some(name) = pattern.name() else {
						continue;
					};
					let full_name = if namespaces.is_empty() {
						name.to_string()
					} else {
						format!("{}:{}", namespaces.join(":"), name)
					};
					let template = format!("{}{}", prefix, pattern.pattern().as_str());
					let mut params = prefix_params.to_vec();
					params.extend(pattern.pattern().params().iter().cloned());
					self.entries
						.entry(full_name)
						.or_insert(ReverseEntry { template, params });
				}
				UrlEntry::Include(include) => {
					let nested_prefix = format!("{}{}", prefix, include.prefix().as_str());
					let mut nested_params = prefix_params.to_vec();
					nested_params.extend(include.prefix().params().iter().cloned());

					let pushed = match include.tree().effective_namespace() {
						Some(namespace) => {
							namespaces.push(namespace.to_string());
							true
						}
						None => false,
					};
					self.collect(include.tree(), &nested_prefix, &nested_params, namespaces);
					if pushed {
						namespaces.pop();
					}
				}
			}
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Registered full names, in registration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Builds the path for `name`, absolute from the tree root.
	///
	/// Values come from `kwargs` by parameter name first, then from `args`
	/// positionally in declaration order. Every value must satisfy its
	/// parameter's converter. The global entry point
	/// [`reverse`](crate::urlconf::reverse) additionally applies the
	/// configured script prefix.
	///
	/// # Errors
	///
	/// [`ReverseError::NoReverseMatch`] for unknown names, and the parameter
	/// errors described on each variant.
	pub fn reverse(
		&self,
		name: &str,
		args: &[&str],
		kwargs: &[(&str, &str)],
	) -> ReverseResult<String> {
		let entry = self
			.entries
			.get(name)
			.ok_or_else(|| ReverseError::NoReverseMatch {
				name: name.to_string(),
			})?;

		let mut positional = args.iter();
		let mut values: Vec<&str> = Vec::with_capacity(entry.params.len());
		for param in &entry.params {
			let value = kwargs
				.iter()
				.find(|(key, _)| *key == param.name())
				.map(|(_, value)| *value)
				.or_else(|| positional.next().copied())
				.ok_or_else(|| ReverseError::MissingParam {
					name: name.to_string(),
					param: param.name().to_string(),
				})?;
			if !param.converter().check(value) {
				return Err(ReverseError::InvalidParam {
					name: name.to_string(),
					param: param.name().to_string(),
					value: value.to_string(),
					converter: param.converter().name(),
				});
			}
			values.push(value);
		}
		if positional.next().is_some() {
			return Err(ReverseError::ExtraArgs {
				name: name.to_string(),
			});
		}

		let filled = match entry.params.len() {
			0 => entry.template.clone(),
			1 => entry
				.template
				.replacen(entry.params[0].token(), values[0], 1),
			_ => self.substitute_all(name, entry, &values)?,
		};
		Ok(format!("/{filled}"))
	}

	/// Builds the path for `name` resolved inside a namespace scope.
	///
	/// The exact name `scope_1:..:scope_k:name` is tried first. When that is
	/// not registered, the first registered name under the scope whose leaf
	/// segment is `name` is used instead, so a composite router can reverse a
	/// view declared by one of its nested routers without spelling the
	/// intermediate namespaces. Ambiguity goes to the earliest registration.
	///
	/// # Errors
	///
	/// [`ReverseError::NoReverseMatch`] when no registered name qualifies.
	pub fn reverse_in_scope(
		&self,
		scope: &[&str],
		name: &str,
		args: &[&str],
		kwargs: &[(&str, &str)],
	) -> ReverseResult<String> {
		let direct = if scope.is_empty() {
			name.to_string()
		} else {
			format!("{}:{}", scope.join(":"), name)
		};
		if self.entries.contains_key(&direct) {
			return self.reverse(&direct, args, kwargs);
		}

		let prefix = if scope.is_empty() {
			String::new()
		} else {
			format!("{}:", scope.join(":"))
		};
		let suffix = format!(":{name}");
		let found = self
			.entries
			.keys()
			.find(|key| key.starts_with(&prefix) && key.ends_with(&suffix))
			.cloned();
		match found {
			Some(full) => self.reverse(&full, args, kwargs),
			None => Err(ReverseError::NoReverseMatch { name: direct }),
		}
	}

	fn substitute_all(
		&self,
		name: &str,
		entry: &ReverseEntry,
		values: &[&str],
	) -> ReverseResult<String> {
		let tokens: Vec<&str> = entry.params.iter().map(|p| p.token()).collect();
		let automaton = AhoCorasick::new(&tokens).map_err(|e| ReverseError::Substitution {
			name: name.to_string(),
			reason: e.to_string(),
		})?;
		Ok(automaton.replace_all(&entry.template, values))
	}
}
