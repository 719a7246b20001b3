//! Installed models
//!
//! Pairs the content type registry with the schema of every known model.

use crate::contenttypes::{ContentType, ContentTypeId, ContentTypeRegistry};
use crate::error::{AdminError, AdminResult};
use crate::path::RelationPath;
use crate::schema::ModelMeta;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of installed models keyed by natural key
#[derive(Debug, Default)]
pub struct Apps {
	content_types: ContentTypeRegistry,
	models: RwLock<HashMap<String, Arc<ModelMeta>>>,
}

impl Apps {
	pub fn new() -> Self {
		Self::default()
	}

	/// Install a model, registering its content type
	///
	/// Re-installing a model replaces its schema and keeps its content type id.
	pub fn register_model(&self, meta: ModelMeta) -> ContentType {
		self.register_model_with_id(meta, None)
	}

	/// Install a model, asking for a specific content type id
	pub fn register_model_with_id(&self, meta: ModelMeta, id: Option<ContentTypeId>) -> ContentType {
		let mut content_type = meta.content_type();
		content_type.id = id;
		let stored = self.content_types.register(content_type);

		tracing::debug!(
			model = %meta.natural_key(),
			content_type_id = ?stored.id,
			"Installed model"
		);
		self.models
			.write()
			.insert(meta.natural_key(), Arc::new(meta));
		stored
	}

	pub fn content_types(&self) -> &ContentTypeRegistry {
		&self.content_types
	}

	/// Schema for a natural key
	pub fn get_model(&self, natural_key: &str) -> Option<Arc<ModelMeta>> {
		self.models.read().get(&natural_key.to_lowercase()).cloned()
	}

	/// Schema for a natural key, failing when the model is not installed
	pub fn require_model(&self, natural_key: &str) -> AdminResult<Arc<ModelMeta>> {
		self.get_model(natural_key)
			.ok_or_else(|| AdminError::ModelNotRegistered(natural_key.to_string()))
	}

	/// Schema behind a content type
	pub fn model_for_content_type(&self, content_type: &ContentType) -> Option<Arc<ModelMeta>> {
		self.get_model(&content_type.natural_key())
	}

	/// Content type for an installed model's natural key
	pub fn content_type_for(&self, natural_key: &str) -> Option<ContentType> {
		self.content_types.get_by_natural_key(natural_key)
	}

	/// Resolve a content type id
	pub fn resolve_content_type(&self, id: ContentTypeId) -> AdminResult<ContentType> {
		self.content_types
			.get_by_id(id)
			.ok_or(AdminError::ContentTypeNotFound(id))
	}

	/// Schema reached by walking `path` from `base`
	///
	/// Every hop must be a relation field leading to an installed model.
	pub fn model_at(&self, base: &Arc<ModelMeta>, path: &RelationPath) -> AdminResult<Arc<ModelMeta>> {
		let mut model = base.clone();
		for hop in path.hops() {
			let target = model
				.get_field(hop)
				.and_then(|field| field.kind.related_model())
				.ok_or_else(|| {
					AdminError::InvalidParameter(format!(
						"'{}' is not a relation of {}",
						hop,
						model.natural_key()
					))
				})?;
			model = self.require_model(target)?;
		}
		Ok(model)
	}

	/// All installed models ordered by content type id
	pub fn models(&self) -> Vec<(ContentType, Arc<ModelMeta>)> {
		self.content_types
			.all()
			.into_iter()
			.filter_map(|ct| self.model_for_content_type(&ct).map(|meta| (ct, meta)))
			.collect()
	}
}
