//! Type-safe per-request storage.
//!
//! Middleware attaches data here (auth state, router context) for views and
//! later middleware to read. Values are keyed by type and cloned out.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Type-keyed extension map. Cloning the map shares the underlying storage,
/// so a request cloned through the middleware chain sees the same entries.
#[derive(Clone, Default)]
pub struct Extensions {
	map: Arc<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl Extensions {
	/// # Examples
	///
	/// ```
	/// use routeset_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// extensions.insert(42u32);
	/// assert_eq!(extensions.get::<u32>(), Some(42));
	/// assert_eq!(extensions.get::<String>(), None);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value, replacing any previous value of the same type.
	pub fn insert<T: Send + Sync + 'static>(&self, value: T) {
		let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.insert(TypeId::of::<T>(), Box::new(value));
	}

	/// Clones out the stored value of type `T`, if any.
	pub fn get<T>(&self) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.get(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>())
			.cloned()
	}

	pub fn contains<T: 'static>(&self) -> bool {
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.contains_key(&TypeId::of::<T>())
	}

	/// Removes and returns the stored value of type `T`.
	pub fn remove<T>(&self) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.remove(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>().cloned())
	}
}

impl std::fmt::Debug for Extensions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		f.debug_struct("Extensions")
			.field("len", &map.len())
			.finish()
	}
}
