//! Fixture loading
//!
//! A fixture file seeds the in-memory backends of a server: model schemas,
//! records in the `{model, pk, fields}` layout, and prepared sessions.
//!
//! ```json
//! {
//!   "models": [
//!     {"id": 7, "app_label": "shop", "model_name": "Customer",
//!      "fields": [{"name": "name", "type": "text"}]}
//!   ],
//!   "records": [
//!     {"model": "shop.customer", "pk": 1, "fields": {"name": "Ada"}}
//!   ],
//!   "sessions": {
//!     "staff": {"_auth_user": {"username": "root", "is_staff": true, "is_superuser": true}}
//!   }
//! }
//! ```

use admin_export_core::{
	AdminSite, ContentTypeId, InMemoryRecordStore, ModelAdminConfig, ModelMeta, Record,
};
use admin_export_http::{InMemorySessionBackend, SessionBackend, SessionError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors raised while reading or installing fixtures
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
	#[error("Failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Model not found: {0}")]
	ModelNotFound(String),

	#[error("Content type id {requested} for {model} is already taken")]
	ContentTypeConflict {
		model: String,
		requested: ContentTypeId,
	},

	#[error("Invalid record for {model}: {message}")]
	InvalidRecord { model: String, message: String },

	#[error("Session error: {0}")]
	Session(#[from] SessionError),
}

fn default_true() -> bool {
	true
}

/// A model schema with installation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureModel {
	/// Requested content type id
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ContentTypeId>,
	/// Register a model admin, making the model exportable
	#[serde(default = "default_true")]
	pub admin: bool,
	#[serde(flatten)]
	pub meta: ModelMeta,
}

/// One stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
	/// Natural key `app_label.model`
	pub model: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pk: Option<Value>,
	#[serde(default)]
	pub fields: Map<String, Value>,
}

/// Parsed fixture file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixtures {
	#[serde(default)]
	pub models: Vec<FixtureModel>,
	#[serde(default)]
	pub records: Vec<FixtureRecord>,
	#[serde(default)]
	pub sessions: BTreeMap<String, Value>,
}

/// Counts of installed fixture entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
	pub models: usize,
	pub admins: usize,
	pub records: usize,
	pub sessions: usize,
}

impl Fixtures {
	pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
		let content = fs::read_to_string(path).map_err(|source| FixtureError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let fixtures = Self::from_json_str(&content)?;
		tracing::debug!(
			path = %path.display(),
			models = fixtures.models.len(),
			records = fixtures.records.len(),
			"Parsed fixture file"
		);
		Ok(fixtures)
	}

	pub fn from_json_str(content: &str) -> Result<Self, FixtureError> {
		Ok(serde_json::from_str(content)?)
	}

	/// Install into a site, a record store and a session backend
	///
	/// Models are installed first so records can be checked against them.
	pub async fn install(
		self,
		site: &AdminSite,
		store: &InMemoryRecordStore,
		sessions: &InMemorySessionBackend,
	) -> Result<LoadSummary, FixtureError> {
		let mut summary = LoadSummary::default();

		for model in self.models {
			let key = model.meta.natural_key();
			let content_type = site.apps().register_model_with_id(model.meta.clone(), model.id);
			if let Some(requested) = model.id
				&& content_type.id != Some(requested)
			{
				return Err(FixtureError::ContentTypeConflict {
					model: key,
					requested,
				});
			}
			summary.models += 1;

			if model.admin {
				site.register(Arc::new(ModelAdminConfig::new(model.meta)));
				summary.admins += 1;
			}
		}

		for entry in self.records {
			let meta = site
				.apps()
				.get_model(&entry.model)
				.ok_or_else(|| FixtureError::ModelNotFound(entry.model.clone()))?;
			let record = build_record(&meta, entry)?;
			store.insert(&meta.natural_key(), record);
			summary.records += 1;
		}

		for (key, data) in &self.sessions {
			if !data.is_object() {
				return Err(FixtureError::InvalidRecord {
					model: "session".to_string(),
					message: format!("session '{}' must be an object", key),
				});
			}
			sessions.save(key, data).await?;
			summary.sessions += 1;
		}

		tracing::info!(
			models = summary.models,
			admins = summary.admins,
			records = summary.records,
			sessions = summary.sessions,
			"Installed fixtures"
		);
		Ok(summary)
	}
}

/// Merge the fixture pk into the record under the model's pk field
fn build_record(meta: &ModelMeta, entry: FixtureRecord) -> Result<Record, FixtureError> {
	let mut fields = entry.fields;
	let existing = fields.get(&meta.pk_field).cloned();
	match (entry.pk, existing) {
		(Some(pk), Some(existing)) if pk != existing => {
			return Err(FixtureError::InvalidRecord {
				model: entry.model,
				message: format!("pk {} disagrees with field {} = {}", pk, meta.pk_field, existing),
			});
		}
		(Some(pk), _) => {
			fields.insert(meta.pk_field.clone(), pk);
		}
		(None, Some(_)) => {}
		(None, None) => {
			return Err(FixtureError::InvalidRecord {
				model: entry.model,
				message: format!("missing primary key {}", meta.pk_field),
			});
		}
	}

	Ok(fields
		.into_iter()
		.fold(Record::new(), |record, (name, value)| record.with(name, value)))
}
