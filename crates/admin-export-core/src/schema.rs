//! Model schema definitions
//!
//! Models are described by data rather than by Rust types so that any record
//! store can be exported. Relation targets are content type natural keys
//! (`app_label.model`).

use crate::contenttypes::{ContentType, natural_key};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field kinds
///
/// Serialized with a `type` tag, e.g. `{"type": "foreign_key", "to": "shop.customer"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
	Text,
	Integer,
	Float,
	Decimal,
	Boolean,
	Date,
	DateTime,
	Json,
	/// Single related record; the stored value is the related primary key
	ForeignKey { to: String },
	/// Many related records; the stored value is an array of primary keys
	ManyToMany { to: String },
	/// Records of `from` whose `field` points back at this record
	Reverse { from: String, field: String },
}

impl FieldKind {
	/// Short name used in templates
	pub fn type_name(&self) -> &'static str {
		match self {
			FieldKind::Text => "text",
			FieldKind::Integer => "integer",
			FieldKind::Float => "float",
			FieldKind::Decimal => "decimal",
			FieldKind::Boolean => "boolean",
			FieldKind::Date => "date",
			FieldKind::DateTime => "datetime",
			FieldKind::Json => "json",
			FieldKind::ForeignKey { .. } => "foreign_key",
			FieldKind::ManyToMany { .. } => "many_to_many",
			FieldKind::Reverse { .. } => "reverse",
		}
	}

	pub fn is_relation(&self) -> bool {
		matches!(
			self,
			FieldKind::ForeignKey { .. } | FieldKind::ManyToMany { .. } | FieldKind::Reverse { .. }
		)
	}

	/// Natural key of the model on the other side of a relation
	pub fn related_model(&self) -> Option<&str> {
		match self {
			FieldKind::ForeignKey { to } | FieldKind::ManyToMany { to } => Some(to),
			FieldKind::Reverse { from, .. } => Some(from),
			_ => None,
		}
	}
}

/// A stored value and its display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
	pub value: Value,
	pub label: String,
}

/// A model field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verbose_name: Option<String>,
	#[serde(flatten)]
	pub kind: FieldKind,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub choices: Vec<Choice>,
}

impl FieldMeta {
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			verbose_name: None,
			kind,
			choices: Vec::new(),
		}
	}

	pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = Some(verbose_name.into());
		self
	}

	pub fn with_choice(mut self, value: impl Into<Value>, label: impl Into<String>) -> Self {
		self.choices.push(Choice {
			value: value.into(),
			label: label.into(),
		});
		self
	}

	/// Human readable name, defaulting to the field name with spaces
	pub fn label(&self) -> String {
		self.verbose_name
			.clone()
			.unwrap_or_else(|| self.name.replace('_', " "))
	}

	pub fn is_relation(&self) -> bool {
		self.kind.is_relation()
	}

	/// Display label for a stored value, if the field declares choices
	pub fn choice_label(&self, value: &Value) -> Option<&str> {
		self.choices
			.iter()
			.find(|choice| &choice.value == value)
			.map(|choice| choice.label.as_str())
	}
}

fn default_pk_field() -> String {
	"id".to_string()
}

/// Model description
///
/// # Examples
///
/// ```
/// use admin_export_core::{FieldKind, FieldMeta, ModelMeta};
///
/// let meta = ModelMeta::new("shop", "Customer")
///     .with_field(FieldMeta::new("id", FieldKind::Integer))
///     .with_field(FieldMeta::new("name", FieldKind::Text));
///
/// assert_eq!(meta.natural_key(), "shop.customer");
/// assert!(meta.get_field("name").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
	pub app_label: String,
	pub model_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verbose_name: Option<String>,
	#[serde(default = "default_pk_field")]
	pub pk_field: String,
	#[serde(default)]
	pub fields: Vec<FieldMeta>,
	/// Computed values present on records but not stored as columns
	#[serde(default)]
	pub properties: Vec<String>,
}

impl ModelMeta {
	pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
		Self {
			app_label: app_label.into(),
			model_name: model_name.into(),
			verbose_name: None,
			pk_field: default_pk_field(),
			fields: Vec::new(),
			properties: Vec::new(),
		}
	}

	pub fn with_field(mut self, field: FieldMeta) -> Self {
		self.fields.push(field);
		self
	}

	pub fn with_property(mut self, name: impl Into<String>) -> Self {
		self.properties.push(name.into());
		self
	}

	pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = Some(verbose_name.into());
		self
	}

	pub fn natural_key(&self) -> String {
		natural_key(&self.app_label, &self.model_name)
	}

	/// Unsaved content type for this model
	pub fn content_type(&self) -> ContentType {
		ContentType::new(&self.app_label, &self.model_name)
	}

	pub fn verbose_name(&self) -> String {
		self.verbose_name
			.clone()
			.unwrap_or_else(|| self.model_name.to_lowercase())
	}

	pub fn get_field(&self, name: &str) -> Option<&FieldMeta> {
		self.fields.iter().find(|field| field.name == name)
	}

	pub fn has_property(&self, name: &str) -> bool {
		self.properties.iter().any(|property| property == name)
	}
}
