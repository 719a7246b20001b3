//! Admin site
//!
//! The site owns the installed models and the mapping from content type id to
//! model admin. It is populated at startup and only read while serving.

use crate::apps::Apps;
use crate::contenttypes::{ContentType, ContentTypeId};
use crate::error::{AdminError, AdminResult};
use crate::model_admin::{ModelAdmin, ModelAdminConfig};
use crate::schema::ModelMeta;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A model admin resolved from a content type id
#[derive(Clone)]
pub struct ResolvedModel {
	pub content_type: ContentType,
	pub admin: Arc<dyn ModelAdmin>,
}

impl ResolvedModel {
	pub fn id(&self) -> ContentTypeId {
		self.content_type.id.unwrap_or_default()
	}

	pub fn meta(&self) -> &Arc<ModelMeta> {
		self.admin.meta()
	}
}

impl std::fmt::Debug for ResolvedModel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolvedModel")
			.field("content_type", &self.content_type)
			.field("model", &self.admin.model_name())
			.finish()
	}
}

/// Admin site registry
///
/// # Examples
///
/// ```
/// use admin_export_core::{AdminSite, ModelMeta};
///
/// let site = AdminSite::new("Shop admin");
/// let ct = site.register_meta(ModelMeta::new("shop", "Customer"));
///
/// let resolved = site.resolve(ct.id.unwrap()).unwrap();
/// assert_eq!(resolved.admin.model_name(), "Customer");
/// ```
pub struct AdminSite {
	name: String,
	apps: Arc<Apps>,
	registry: RwLock<BTreeMap<ContentTypeId, Arc<dyn ModelAdmin>>>,
}

impl AdminSite {
	pub fn new(name: impl Into<String>) -> Self {
		Self::with_apps(name, Arc::new(Apps::new()))
	}

	/// Site over an existing set of installed models
	pub fn with_apps(name: impl Into<String>, apps: Arc<Apps>) -> Self {
		Self {
			name: name.into(),
			apps,
			registry: RwLock::new(BTreeMap::new()),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn apps(&self) -> &Arc<Apps> {
		&self.apps
	}

	/// Register a model admin, installing its model if needed
	pub fn register(&self, admin: Arc<dyn ModelAdmin>) -> ContentType {
		let key = admin.meta().natural_key();
		let content_type = self.apps.register_model(admin.meta().as_ref().clone());

		if let Some(id) = content_type.id {
			tracing::debug!(model = %key, content_type_id = id, "Registered model admin");
			self.registry.write().insert(id, admin);
		}
		content_type
	}

	/// Register a model with the default admin configuration
	pub fn register_meta(&self, meta: ModelMeta) -> ContentType {
		self.register(Arc::new(ModelAdminConfig::new(meta)))
	}

	pub fn is_registered(&self, id: ContentTypeId) -> bool {
		self.registry.read().contains_key(&id)
	}

	/// Resolve a content type id to its model admin
	///
	/// Unknown ids fail with `ContentTypeNotFound`; known content types without an
	/// admin fail with `ModelNotRegistered`.
	pub fn resolve(&self, id: ContentTypeId) -> AdminResult<ResolvedModel> {
		let content_type = self.apps.resolve_content_type(id)?;
		let admin = self
			.registry
			.read()
			.get(&id)
			.cloned()
			.ok_or_else(|| AdminError::ModelNotRegistered(content_type.natural_key()))?;

		Ok(ResolvedModel {
			content_type,
			admin,
		})
	}

	/// Registered models ordered by content type id
	pub fn registered_models(&self) -> Vec<ResolvedModel> {
		self.registry
			.read()
			.iter()
			.filter_map(|(id, admin)| {
				self.apps
					.content_types()
					.get_by_id(*id)
					.map(|content_type| ResolvedModel {
						content_type,
						admin: admin.clone(),
					})
			})
			.collect()
	}
}

impl std::fmt::Debug for AdminSite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AdminSite")
			.field("name", &self.name)
			.field("registered", &self.registry.read().len())
			.finish()
	}
}
