//! Report conversion
//!
//! Turns a record set, a list of selected field names and the acting user into
//! rows of display strings.

use crate::apps::Apps;
use crate::auth::User;
use crate::error::{AdminError, AdminResult};
use crate::path::RelationPath;
use crate::schema::{FieldKind, FieldMeta, ModelMeta};
use crate::store::{Record, RecordSet, RecordStore, key_string};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Message returned when the user may not read the base model
pub const PERMISSION_DENIED: &str = "Permission Denied";

/// Converted rows and an optional message for the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutcome {
	pub rows: Vec<Vec<String>>,
	pub message: Option<String>,
}

/// Converts records into export rows
#[async_trait]
pub trait ReportConverter: Send + Sync {
	/// One row per record, one cell per entry of `fields` in order
	async fn report_to_list(
		&self,
		records: &RecordSet,
		fields: &[String],
		user: &User,
	) -> AdminResult<ReportOutcome>;
}

/// Render a stored value as a cell
///
/// # Examples
///
/// ```
/// use admin_export_core::display_value;
/// use serde_json::json;
///
/// assert_eq!(display_value(&json!("Ada")), "Ada");
/// assert_eq!(display_value(&json!(4.5)), "4.5");
/// assert_eq!(display_value(&json!(true)), "True");
/// assert_eq!(display_value(&json!(null)), "");
/// assert_eq!(display_value(&json!([1, 2])), "1, 2");
/// ```
pub fn display_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Bool(true) => "True".to_string(),
		Value::Bool(false) => "False".to_string(),
		Value::Number(n) => n.to_string(),
		Value::Array(items) => items
			.iter()
			.map(display_value)
			.collect::<Vec<_>>()
			.join(", "),
		Value::Object(_) => value.to_string(),
	}
}

/// One relation hop taken while resolving a column
#[derive(Debug, Clone)]
struct Hop {
	field: FieldMeta,
	from: Arc<ModelMeta>,
	to: Arc<ModelMeta>,
}

#[derive(Debug, Clone)]
enum Leaf {
	Field(FieldMeta),
	Property(String),
}

/// How to compute one output column
#[derive(Debug, Clone)]
enum Column {
	Resolved {
		hops: Vec<Hop>,
		model: Arc<ModelMeta>,
		leaf: Leaf,
	},
	Blank,
}

enum Rejection {
	Unknown,
	Denied,
}

/// Converter reading related records from a [`RecordStore`]
pub struct DefaultReportConverter {
	apps: Arc<Apps>,
	store: Arc<dyn RecordStore>,
}

impl DefaultReportConverter {
	pub fn new(apps: Arc<Apps>, store: Arc<dyn RecordStore>) -> Self {
		Self { apps, store }
	}

	fn plan_column(&self, base: &Arc<ModelMeta>, qualified: &str, user: &User) -> Result<Column, Rejection> {
		let (path, name) = RelationPath::split_field(qualified);
		if name.is_empty() {
			return Err(Rejection::Unknown);
		}

		let mut model = base.clone();
		let mut hops = Vec::with_capacity(path.hops().len());
		for hop in path.hops() {
			let field = model.get_field(hop).ok_or(Rejection::Unknown)?;
			let target = field.kind.related_model().ok_or(Rejection::Unknown)?;
			let to = self.apps.get_model(target).ok_or(Rejection::Unknown)?;
			if !user.can_view_or_change(&to.content_type()) {
				return Err(Rejection::Denied);
			}
			hops.push(Hop {
				field: field.clone(),
				from: model.clone(),
				to: to.clone(),
			});
			model = to;
		}

		let leaf = if let Some(field) = model.get_field(&name) {
			Leaf::Field(field.clone())
		} else if model.has_property(&name) {
			Leaf::Property(name)
		} else {
			return Err(Rejection::Unknown);
		};

		Ok(Column::Resolved { hops, model, leaf })
	}

	/// Records reached from `record` by following `field` of `from`
	async fn follow(
		&self,
		record: &Record,
		from: &ModelMeta,
		field: &FieldMeta,
		to: &ModelMeta,
	) -> AdminResult<Vec<Record>> {
		let to_key = to.natural_key();
		match &field.kind {
			FieldKind::ForeignKey { .. } => {
				let Some(pk) = record.get(&field.name).and_then(key_string) else {
					return Ok(Vec::new());
				};
				Ok(self
					.store
					.get(&to_key, &to.pk_field, &pk)
					.await?
					.into_iter()
					.collect())
			}
			FieldKind::ManyToMany { .. } => {
				let pks: Vec<String> = match record.get(&field.name) {
					Some(Value::Array(items)) => items.iter().filter_map(key_string).collect(),
					Some(other) => key_string(other).into_iter().collect(),
					None => Vec::new(),
				};
				let mut related = Vec::with_capacity(pks.len());
				for pk in pks {
					if let Some(found) = self.store.get(&to_key, &to.pk_field, &pk).await? {
						related.push(found);
					}
				}
				Ok(related)
			}
			FieldKind::Reverse { field: back, .. } => {
				let Some(pk) = record.pk(&from.pk_field) else {
					return Ok(Vec::new());
				};
				self.store.filter_by(&to_key, back, &pk).await
			}
			_ => Ok(Vec::new()),
		}
	}

	async fn leaf_value(&self, record: &Record, model: &ModelMeta, leaf: &Leaf) -> AdminResult<String> {
		let field = match leaf {
			Leaf::Property(name) => return Ok(record.get(name).map(display_value).unwrap_or_default()),
			Leaf::Field(field) => field,
		};

		if let FieldKind::Reverse { from, field: back } = &field.kind {
			let Some(pk) = record.pk(&model.pk_field) else {
				return Ok(String::new());
			};
			let related_pk = self
				.apps
				.get_model(from)
				.map(|meta| meta.pk_field.clone())
				.unwrap_or_else(|| "id".to_string());
			let related = self.store.filter_by(from, back, &pk).await?;
			return Ok(related
				.iter()
				.filter_map(|r| r.pk(&related_pk))
				.collect::<Vec<_>>()
				.join(", "));
		}

		let value = record.get(&field.name).cloned().unwrap_or(Value::Null);
		Ok(match field.choice_label(&value) {
			Some(label) => label.to_string(),
			None => display_value(&value),
		})
	}

	async fn cell(&self, record: &Record, column: &Column) -> AdminResult<String> {
		let Column::Resolved { hops, model, leaf } = column else {
			return Ok(String::new());
		};

		let mut current = vec![record.clone()];
		for hop in hops {
			let mut next = Vec::new();
			for item in &current {
				next.extend(self.follow(item, &hop.from, &hop.field, &hop.to).await?);
			}
			current = next;
		}

		let mut values = Vec::with_capacity(current.len());
		for item in &current {
			values.push(self.leaf_value(item, model, leaf).await?);
		}
		Ok(values.join(", "))
	}
}

#[async_trait]
impl ReportConverter for DefaultReportConverter {
	async fn report_to_list(
		&self,
		records: &RecordSet,
		fields: &[String],
		user: &User,
	) -> AdminResult<ReportOutcome> {
		let base = self
			.apps
			.model_for_content_type(&records.content_type)
			.ok_or_else(|| AdminError::ModelNotRegistered(records.content_type.natural_key()))?;

		if !user.can_view_or_change(&records.content_type) {
			tracing::warn!(
				user = %user.username,
				model = %base.natural_key(),
				"User may not read base model"
			);
			return Ok(ReportOutcome {
				rows: Vec::new(),
				message: Some(PERMISSION_DENIED.to_string()),
			});
		}

		let mut messages = Vec::new();
		let columns: Vec<Column> = fields
			.iter()
			.map(|field| match self.plan_column(&base, field, user) {
				Ok(column) => column,
				Err(Rejection::Unknown) => {
					messages.push(format!("Error: Unknown field {}.", field));
					Column::Blank
				}
				Err(Rejection::Denied) => {
					messages.push(format!("Error: Permission denied on access to {}.", field));
					Column::Blank
				}
			})
			.collect();

		let mut rows = Vec::with_capacity(records.len());
		for record in &records.records {
			let mut row = Vec::with_capacity(columns.len());
			for column in &columns {
				row.push(self.cell(record, column).await?);
			}
			rows.push(row);
		}

		tracing::debug!(
			model = %base.natural_key(),
			rows = rows.len(),
			columns = columns.len(),
			"Converted records"
		);

		Ok(ReportOutcome {
			rows,
			message: (!messages.is_empty()).then(|| messages.join(" ")),
		})
	}
}
