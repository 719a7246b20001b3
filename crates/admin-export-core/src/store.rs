//! Record storage
//!
//! Export only reads records. Models are addressed by natural key and primary
//! keys are compared by their string form, so `1` and `"1"` name the same record.

use crate::contenttypes::ContentType;
use crate::error::AdminResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A stored record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(key.into(), value.into());
		self
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn fields(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Primary key as a string, if present
	pub fn pk(&self, pk_field: &str) -> Option<String> {
		self.get(pk_field).and_then(key_string)
	}
}

impl From<Map<String, Value>> for Record {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

/// String form used to compare primary keys
///
/// Null, arrays and objects never act as keys.
pub fn key_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

/// Records of one model filtered by primary key
#[derive(Debug, Clone)]
pub struct RecordSet {
	pub content_type: ContentType,
	pub records: Vec<Record>,
}

impl RecordSet {
	pub fn new(content_type: ContentType, records: Vec<Record>) -> Self {
		Self {
			content_type,
			records,
		}
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

/// Read access to stored records
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Records of `model` whose primary key is in `pks`, in store order
	async fn filter_pks(&self, model: &str, pk_field: &str, pks: &[String]) -> AdminResult<Vec<Record>>;

	/// A single record by primary key
	async fn get(&self, model: &str, pk_field: &str, pk: &str) -> AdminResult<Option<Record>>;

	/// Records of `model` whose `field` holds `value`
	///
	/// Used to follow reverse relations.
	async fn filter_by(&self, model: &str, field: &str, value: &str) -> AdminResult<Vec<Record>>;
}

/// Record store held in memory, keeping insertion order per model
///
/// # Examples
///
/// ```
/// use admin_export_core::{InMemoryRecordStore, Record, RecordStore};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryRecordStore::new();
/// store.insert("shop.customer", Record::new().with("id", 1).with("name", "Ada"));
///
/// let found = store.get("shop.customer", "id", "1").await.unwrap();
/// assert!(found.is_some());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
	records: RwLock<HashMap<String, Vec<Record>>>,
}

impl InMemoryRecordStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, model: &str, record: Record) {
		self.records
			.write()
			.entry(model.to_lowercase())
			.or_default()
			.push(record);
	}

	pub fn count(&self, model: &str) -> usize {
		self.records
			.read()
			.get(&model.to_lowercase())
			.map_or(0, Vec::len)
	}
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
	async fn filter_pks(&self, model: &str, pk_field: &str, pks: &[String]) -> AdminResult<Vec<Record>> {
		let records = self.records.read();
		Ok(records
			.get(&model.to_lowercase())
			.map(|rows| {
				rows.iter()
					.filter(|record| record.pk(pk_field).is_some_and(|pk| pks.contains(&pk)))
					.cloned()
					.collect()
			})
			.unwrap_or_default())
	}

	async fn get(&self, model: &str, pk_field: &str, pk: &str) -> AdminResult<Option<Record>> {
		let records = self.records.read();
		Ok(records.get(&model.to_lowercase()).and_then(|rows| {
			rows.iter()
				.find(|record| record.pk(pk_field).as_deref() == Some(pk))
				.cloned()
		}))
	}

	async fn filter_by(&self, model: &str, field: &str, value: &str) -> AdminResult<Vec<Record>> {
		let records = self.records.read();
		Ok(records
			.get(&model.to_lowercase())
			.map(|rows| {
				rows.iter()
					.filter(|record| {
						record
							.get(field)
							.and_then(key_string)
							.is_some_and(|v| v == value)
					})
					.cloned()
					.collect()
			})
			.unwrap_or_default())
	}
}
