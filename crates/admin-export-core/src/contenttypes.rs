//! Content type registry
//!
//! A content type names a model by `app_label` and `model` and is addressed by a
//! numeric id. Requests refer to models only through these ids.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Numeric content type identifier
pub type ContentTypeId = i64;

/// A registered model identity
///
/// # Examples
///
/// ```
/// use admin_export_core::ContentType;
///
/// let ct = ContentType::new("shop", "Customer");
/// assert!(ct.id.is_none());
/// assert_eq!(ct.natural_key(), "shop.customer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentType {
	pub id: Option<ContentTypeId>,
	pub app_label: String,
	pub model: String,
}

impl ContentType {
	/// Create an unsaved content type
	pub fn new(app_label: impl Into<String>, model: impl Into<String>) -> Self {
		Self {
			id: None,
			app_label: app_label.into(),
			model: model.into(),
		}
	}

	/// `app_label.model`, lowercased
	pub fn natural_key(&self) -> String {
		natural_key(&self.app_label, &self.model)
	}
}

/// Build the lowercase `app_label.model` key used for relation targets
pub fn natural_key(app_label: &str, model: &str) -> String {
	format!("{}.{}", app_label.to_lowercase(), model.to_lowercase())
}

#[derive(Debug, Default)]
struct RegistryInner {
	by_id: BTreeMap<ContentTypeId, ContentType>,
	by_key: HashMap<String, ContentTypeId>,
}

impl RegistryInner {
	/// One past the highest id in use, or the lowest free positive id once
	/// that would overflow
	fn next_id(&self) -> ContentTypeId {
		match self.by_id.keys().next_back() {
			None => 1,
			Some(max) => max
				.checked_add(1)
				.or_else(|| (1..ContentTypeId::MAX).find(|id| !self.by_id.contains_key(id)))
				.unwrap_or(1),
		}
	}
}

/// In-memory content type registry
///
/// Fresh ids are one past the highest id in use.
#[derive(Debug, Default)]
pub struct ContentTypeRegistry {
	inner: RwLock<RegistryInner>,
}

impl ContentTypeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a content type, returning the stored entry
	///
	/// Registering a natural key twice returns the existing entry. An explicit id
	/// on the argument is kept when it is free.
	///
	/// # Examples
	///
	/// ```
	/// use admin_export_core::{ContentType, ContentTypeRegistry};
	///
	/// let registry = ContentTypeRegistry::new();
	/// let first = registry.register(ContentType::new("shop", "Customer"));
	/// let again = registry.register(ContentType::new("shop", "customer"));
	/// assert_eq!(first.id, again.id);
	/// ```
	pub fn register(&self, content_type: ContentType) -> ContentType {
		let key = content_type.natural_key();
		let mut inner = self.inner.write();

		if let Some(id) = inner.by_key.get(&key)
			&& let Some(existing) = inner.by_id.get(id)
		{
			return existing.clone();
		}

		let id = match content_type.id {
			Some(id) if !inner.by_id.contains_key(&id) => id,
			_ => inner.next_id(),
		};

		let stored = ContentType {
			id: Some(id),
			..content_type
		};
		inner.by_key.insert(key, id);
		inner.by_id.insert(id, stored.clone());
		stored
	}

	/// Look up by app label and model name (case-insensitive)
	pub fn get(&self, app_label: &str, model: &str) -> Option<ContentType> {
		self.get_by_natural_key(&natural_key(app_label, model))
	}

	/// Look up by `app_label.model`
	pub fn get_by_natural_key(&self, key: &str) -> Option<ContentType> {
		let inner = self.inner.read();
		inner
			.by_key
			.get(&key.to_lowercase())
			.and_then(|id| inner.by_id.get(id))
			.cloned()
	}

	/// Look up by id
	pub fn get_by_id(&self, id: ContentTypeId) -> Option<ContentType> {
		self.inner.read().by_id.get(&id).cloned()
	}

	/// All content types ordered by id
	pub fn all(&self) -> Vec<ContentType> {
		self.inner.read().by_id.values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.inner.read().by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
