//! Sessions
//!
//! A session is a JSON object stored by a [`SessionBackend`] under a random key
//! carried in a cookie. Export reads the acting user and stored id lists from it.

use crate::Request;
use admin_export_core::{AdminError, AdminResult, User};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Session key holding the acting user
pub const AUTH_USER_KEY: &str = "_auth_user";

/// Session backend errors
#[derive(Debug, Error)]
pub enum SessionError {
	#[error("Session serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Session backend failure: {0}")]
	Backend(String),
}

impl From<SessionError> for AdminError {
	fn from(err: SessionError) -> Self {
		AdminError::StoreError(err.to_string())
	}
}

/// Storage for session data
#[async_trait]
pub trait SessionBackend: Send + Sync {
	async fn load(&self, session_key: &str) -> Result<Option<Value>, SessionError>;

	async fn save(&self, session_key: &str, data: &Value) -> Result<(), SessionError>;
}

/// Session backend held in memory
///
/// # Examples
///
/// ```
/// use admin_export_http::{InMemorySessionBackend, SessionBackend};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let backend = InMemorySessionBackend::new();
/// backend.save("abc", &json!({"k": 1})).await.unwrap();
/// assert_eq!(backend.load("abc").await.unwrap(), Some(json!({"k": 1})));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemorySessionBackend {
	sessions: RwLock<HashMap<String, Value>>,
}

impl InMemorySessionBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.sessions.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[async_trait]
impl SessionBackend for InMemorySessionBackend {
	async fn load(&self, session_key: &str) -> Result<Option<Value>, SessionError> {
		Ok(self.sessions.read().get(session_key).cloned())
	}

	async fn save(&self, session_key: &str, data: &Value) -> Result<(), SessionError> {
		self.sessions
			.write()
			.insert(session_key.to_string(), data.clone());
		Ok(())
	}
}

/// Per-request view of a session
pub struct Session {
	key: Option<String>,
	data: Map<String, Value>,
	modified: bool,
	backend: Arc<dyn SessionBackend>,
}

impl Session {
	/// Load the session named by the request's cookie
	///
	/// A missing cookie or unknown key yields an empty session.
	pub async fn from_request(
		request: &Request,
		cookie_name: &str,
		backend: Arc<dyn SessionBackend>,
	) -> AdminResult<Self> {
		let key = request.cookie(cookie_name);
		let data = match &key {
			Some(key) => match backend.load(key).await? {
				Some(Value::Object(map)) => map,
				_ => Map::new(),
			},
			None => Map::new(),
		};

		Ok(Self {
			key,
			data,
			modified: false,
			backend,
		})
	}

	pub fn key(&self) -> Option<&str> {
		self.key.as_deref()
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.data.get(name)
	}

	pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
		self.get(name)
			.and_then(|value| serde_json::from_value(value.clone()).ok())
	}

	pub fn set(&mut self, name: impl Into<String>, value: impl Serialize) -> AdminResult<()> {
		let value = serde_json::to_value(value).map_err(SessionError::from)?;
		self.data.insert(name.into(), value);
		self.modified = true;
		Ok(())
	}

	/// The acting user, anonymous when none is stored
	pub fn user(&self) -> User {
		self.get_as(AUTH_USER_KEY).unwrap_or_default()
	}

	/// Id list stored under `name`
	///
	/// Accepts an array of strings or numbers, or a comma separated string.
	pub fn get_ids(&self, name: &str) -> AdminResult<Vec<String>> {
		let ids = match self.get(name) {
			Some(Value::Array(items)) => items
				.iter()
				.filter_map(admin_export_core::store::key_string)
				.collect(),
			Some(Value::String(joined)) => split_ids(joined),
			_ => return Err(AdminError::SessionValueNotFound(name.to_string())),
		};
		Ok(ids)
	}

	/// Persist changes
	///
	/// Returns the new session key when one had to be created, so the caller can
	/// set the cookie.
	pub async fn save(&mut self) -> AdminResult<Option<String>> {
		if !self.modified {
			return Ok(None);
		}

		let (key, created) = match &self.key {
			Some(key) => (key.clone(), false),
			None => (uuid::Uuid::new_v4().simple().to_string(), true),
		};
		self.backend
			.save(&key, &Value::Object(self.data.clone()))
			.await?;
		self.modified = false;
		self.key = Some(key.clone());

		Ok(created.then_some(key))
	}
}

/// Split a comma separated id list, dropping blanks
pub fn split_ids(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|id| !id.is_empty())
		.map(str::to_string)
		.collect()
}
