//! Field and relation introspection
//!
//! Enumerates what can be exported from a model, optionally one relation hop
//! further along a [`RelationPath`].

use crate::apps::Apps;
use crate::contenttypes::ContentType;
use crate::error::{AdminError, AdminResult};
use crate::path::RelationPath;
use crate::schema::{FieldMeta, ModelMeta};
use serde::Serialize;
use std::sync::Arc;

/// A field offered for selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
	pub name: String,
	/// Name as seen from the base model, used as the form input name
	pub qualified_name: String,
	pub label: String,
	pub field_type: String,
	pub is_relation: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub related_model: Option<String>,
}

impl FieldInfo {
	fn from_meta(field: &FieldMeta, path: &RelationPath) -> Self {
		Self {
			name: field.name.clone(),
			qualified_name: path.qualify(&field.name),
			label: field.label(),
			field_type: field.kind.type_name().to_string(),
			is_relation: field.is_relation(),
			related_model: field.kind.related_model().map(str::to_string),
		}
	}
}

/// A computed property offered for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyInfo {
	pub name: String,
	pub qualified_name: String,
	pub label: String,
}

/// Fields selectable at one point of a relation path
#[derive(Debug, Clone, Serialize)]
pub struct FieldSelectionContext {
	pub fields: Vec<FieldInfo>,
	pub properties: Vec<PropertyInfo>,
	pub path: RelationPath,
	pub path_verbose: String,
	pub app_label: String,
	pub model: String,
}

/// Relations reachable one hop further along a path
#[derive(Debug, Clone, Serialize)]
pub struct RelatedFieldsContext {
	pub related_fields: Vec<FieldInfo>,
	pub content_type: ContentType,
	pub path: RelationPath,
}

/// Enumerates exportable fields of models
pub trait FieldIntrospector: Send + Sync {
	/// Scalar fields of a model
	fn direct_fields(&self, model: &ModelMeta) -> Vec<FieldInfo>;

	/// Relation fields of a model
	fn relation_fields(&self, model: &ModelMeta) -> Vec<FieldInfo>;

	/// Computed properties of a model
	fn properties(&self, model: &ModelMeta) -> Vec<PropertyInfo>;

	/// Fields selectable at `path`, or one hop further along `field_name`
	fn get_fields(
		&self,
		model: &ModelMeta,
		field_name: &str,
		path: &RelationPath,
		path_verbose: &str,
	) -> AdminResult<FieldSelectionContext>;

	/// Relation fields of the model behind `field_name`
	fn get_related_fields(
		&self,
		model: &ModelMeta,
		field_name: &str,
		path: &RelationPath,
	) -> AdminResult<RelatedFieldsContext>;
}

/// Introspector backed by installed model schemas
#[derive(Debug, Clone)]
pub struct ModelIntrospector {
	apps: Arc<Apps>,
}

impl ModelIntrospector {
	pub fn new(apps: Arc<Apps>) -> Self {
		Self { apps }
	}

	/// Schema on the other side of `field_name`
	fn follow(&self, model: &ModelMeta, field_name: &str) -> AdminResult<Arc<ModelMeta>> {
		let target = model
			.get_field(field_name)
			.and_then(|field| field.kind.related_model())
			.ok_or_else(|| {
				AdminError::InvalidParameter(format!(
					"'{}' is not a relation of {}",
					field_name,
					model.natural_key()
				))
			})?;
		self.apps.require_model(target)
	}

	fn fields_at(&self, model: &ModelMeta, path: &RelationPath, relations: bool) -> Vec<FieldInfo> {
		model
			.fields
			.iter()
			.filter(|field| field.is_relation() == relations)
			.map(|field| FieldInfo::from_meta(field, path))
			.collect()
	}

	fn properties_at(&self, model: &ModelMeta, path: &RelationPath) -> Vec<PropertyInfo> {
		let mut names: Vec<&String> = model
			.properties
			.iter()
			.filter(|name| !name.ends_with("pk"))
			.collect();
		names.sort();
		names.dedup();

		names
			.into_iter()
			.map(|name| PropertyInfo {
				name: name.clone(),
				qualified_name: path.qualify(name),
				label: name.replace('_', " "),
			})
			.collect()
	}
}

impl FieldIntrospector for ModelIntrospector {
	fn direct_fields(&self, model: &ModelMeta) -> Vec<FieldInfo> {
		self.fields_at(model, &RelationPath::root(), false)
	}

	fn relation_fields(&self, model: &ModelMeta) -> Vec<FieldInfo> {
		self.fields_at(model, &RelationPath::root(), true)
	}

	fn properties(&self, model: &ModelMeta) -> Vec<PropertyInfo> {
		self.properties_at(model, &RelationPath::root())
	}

	fn get_fields(
		&self,
		model: &ModelMeta,
		field_name: &str,
		path: &RelationPath,
		path_verbose: &str,
	) -> AdminResult<FieldSelectionContext> {
		if field_name.is_empty() {
			return Ok(FieldSelectionContext {
				fields: self.fields_at(model, path, false),
				properties: self.properties_at(model, path),
				path: path.clone(),
				path_verbose: path_verbose.to_string(),
				app_label: model.app_label.clone(),
				model: model.model_name.to_lowercase(),
			});
		}

		let related = self.follow(model, field_name)?;
		let path = path.join(field_name);
		tracing::debug!(
			model = %model.natural_key(),
			field = field_name,
			related = %related.natural_key(),
			path = %path,
			"Following relation for field selection"
		);

		Ok(FieldSelectionContext {
			fields: self.fields_at(&related, &path, false),
			properties: self.properties_at(&related, &path),
			path_verbose: related.model_name.to_lowercase(),
			app_label: related.app_label.clone(),
			model: related.model_name.to_lowercase(),
			path,
		})
	}

	fn get_related_fields(
		&self,
		model: &ModelMeta,
		field_name: &str,
		path: &RelationPath,
	) -> AdminResult<RelatedFieldsContext> {
		let related = self.follow(model, field_name)?;
		let content_type = self
			.apps
			.content_type_for(&related.natural_key())
			.ok_or_else(|| AdminError::ModelNotRegistered(related.natural_key()))?;
		let path = path.join(field_name);

		Ok(RelatedFieldsContext {
			related_fields: self.fields_at(&related, &path, true),
			content_type,
			path,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::FieldKind;
	use rstest::{fixture, rstest};

	#[fixture]
	fn apps() -> Arc<Apps> {
		let apps = Arc::new(Apps::new());
		apps.register_model(
			ModelMeta::new("shop", "Customer")
				.with_field(FieldMeta::new("id", FieldKind::Integer))
				.with_field(FieldMeta::new("name", FieldKind::Text))
				.with_field(FieldMeta::new(
					"address",
					FieldKind::ForeignKey {
						to: "shop.address".into(),
					},
				))
				.with_property("full_name")
				.with_property("display_pk")
				.with_property("age"),
		);
		apps.register_model(
			ModelMeta::new("shop", "Address")
				.with_field(FieldMeta::new("city", FieldKind::Text))
				.with_field(FieldMeta::new(
					"country",
					FieldKind::ForeignKey {
						to: "geo.country".into(),
					},
				)),
		);
		apps.register_model(
			ModelMeta::new("geo", "Country").with_field(FieldMeta::new("code", FieldKind::Text)),
		);
		apps
	}

	fn customer(apps: &Apps) -> Arc<ModelMeta> {
		apps.get_model("shop.customer").unwrap()
	}

	#[rstest]
	fn test_direct_and_relation_split(apps: Arc<Apps>) {
		let introspector = ModelIntrospector::new(apps.clone());
		let model = customer(&apps);

		let direct: Vec<_> = introspector
			.direct_fields(&model)
			.into_iter()
			.map(|f| f.name)
			.collect();
		let relations: Vec<_> = introspector
			.relation_fields(&model)
			.into_iter()
			.map(|f| f.name)
			.collect();

		assert_eq!(direct, vec!["id", "name"]);
		assert_eq!(relations, vec!["address"]);
	}

	#[rstest]
	fn test_properties_sorted_without_pk(apps: Arc<Apps>) {
		let introspector = ModelIntrospector::new(apps.clone());
		let props = introspector.properties(&customer(&apps));

		let labels: Vec<_> = props.iter().map(|p| p.label.as_str()).collect();
		assert_eq!(labels, vec!["age", "full name"]);
	}

	#[rstest]
	fn test_get_fields_without_field_keeps_path(apps: Arc<Apps>) {
		let introspector = ModelIntrospector::new(apps.clone());
		let ctx = introspector
			.get_fields(&customer(&apps), "", &RelationPath::root(), "")
			.unwrap();

		assert!(ctx.path.is_root());
		assert_eq!(ctx.model, "customer");
		assert_eq!(ctx.fields[1].qualified_name, "name");
	}

	#[rstest]
	fn test_get_fields_follows_relation(apps: Arc<Apps>) {
		let introspector = ModelIntrospector::new(apps.clone());
		let ctx = introspector
			.get_fields(&customer(&apps), "address", &RelationPath::root(), "")
			.unwrap();

		assert_eq!(ctx.path.to_string(), "address");
		assert_eq!(ctx.path_verbose, "address");
		assert_eq!(ctx.fields.len(), 1);
		assert_eq!(ctx.fields[0].qualified_name, "address.city");
	}

	#[rstest]
	fn test_get_fields_rejects_scalar(apps: Arc<Apps>) {
		let introspector = ModelIntrospector::new(apps.clone());
		let err = introspector
			.get_fields(&customer(&apps), "name", &RelationPath::root(), "")
			.unwrap_err();
		assert!(matches!(err, AdminError::InvalidParameter(_)));
	}

	#[rstest]
	fn test_get_related_fields_two_hops(apps: Arc<Apps>) {
		let introspector = ModelIntrospector::new(apps.clone());
		let address = apps.get_model("shop.address").unwrap();
		let ctx = introspector
			.get_related_fields(&address, "country", &RelationPath::parse("address"))
			.unwrap();

		assert_eq!(ctx.path.to_string(), "address.country");
		assert_eq!(ctx.content_type.natural_key(), "geo.country");
		assert!(ctx.related_fields.is_empty());
	}
}
