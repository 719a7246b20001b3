//! Model admin registration
//!
//! A model admin ties a model schema to the admin site and decides how its
//! records are fetched for export.

use crate::auth::{ContentTypePermission, PermissionAction, User};
use crate::contenttypes::ContentType;
use crate::error::AdminResult;
use crate::schema::ModelMeta;
use crate::store::{Record, RecordStore};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for models exposed through the admin site
#[async_trait]
pub trait ModelAdmin: Send + Sync {
	/// Schema of the administered model
	fn meta(&self) -> &Arc<ModelMeta>;

	fn model_name(&self) -> &str {
		&self.meta().model_name
	}

	fn app_label(&self) -> &str {
		&self.meta().app_label
	}

	fn pk_field(&self) -> &str {
		&self.meta().pk_field
	}

	/// Unsaved content type for this model
	fn get_content_type(&self) -> ContentType {
		ContentType::new(self.app_label(), self.model_name())
	}

	/// Permission string such as `shop.view_customer`
	fn get_permission_codename(&self, action: PermissionAction) -> String {
		ContentTypePermission::format(&self.get_content_type(), action)
	}

	/// Check if user may export records of this model
	///
	/// Consulted by the export view before any row is converted. The default
	/// grants access to users holding `view` or `change`. Overrides can only
	/// narrow access: the converter still requires one of those permissions.
	async fn has_view_permission(&self, user: &User) -> bool {
		[PermissionAction::View, PermissionAction::Change]
			.into_iter()
			.any(|action| user.has_perm(&self.get_permission_codename(action)))
	}

	/// Records selected by primary key, in store order
	async fn get_queryset(&self, store: &dyn RecordStore, pks: &[String]) -> AdminResult<Vec<Record>> {
		store
			.filter_pks(&self.meta().natural_key(), self.pk_field(), pks)
			.await
	}
}

/// Configuration-based model admin implementation
///
/// # Examples
///
/// ```
/// use admin_export_core::{ModelAdmin, ModelAdminConfig, ModelMeta};
///
/// let admin = ModelAdminConfig::new(ModelMeta::new("shop", "Customer"));
/// assert_eq!(admin.model_name(), "Customer");
/// assert_eq!(admin.pk_field(), "id");
/// ```
#[derive(Debug, Clone)]
pub struct ModelAdminConfig {
	meta: Arc<ModelMeta>,
}

impl ModelAdminConfig {
	pub fn new(meta: impl Into<Arc<ModelMeta>>) -> Self {
		Self { meta: meta.into() }
	}
}

#[async_trait]
impl ModelAdmin for ModelAdminConfig {
	fn meta(&self) -> &Arc<ModelMeta> {
		&self.meta
	}
}
