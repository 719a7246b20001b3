//! Export views
//!
//! All views require an active staff user and share one [`ExportState`].

mod export;
mod related;
mod selected;

pub use export::{EXPORT_MESSAGE_HEADER, ExportView, encode_export_message};
pub use related::RelatedFieldsView;
pub use selected::{ExportSelectedView, SESSION_KEY_PREFIX, export_selected_objects};

use crate::session::{Session, SessionBackend, split_ids};
use crate::Request;
use admin_export_core::{
	AdminError, AdminResult, AdminSite, ContentTypeId, DefaultReportConverter, FieldIntrospector,
	ModelIntrospector, RecordStore, ReportConverter, User,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default number of ids above which a selection is stored in the session
pub const DEFAULT_SESSION_IDS_THRESHOLD: usize = 1000;

/// Request-independent view settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
	/// Mount point of the export views, without trailing slash
	pub url_prefix: String,
	pub session_cookie_name: String,
	pub session_ids_threshold: usize,
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			url_prefix: "/export".to_string(),
			session_cookie_name: "sessionid".to_string(),
			session_ids_threshold: DEFAULT_SESSION_IDS_THRESHOLD,
		}
	}
}

/// State shared by the export views
pub struct ExportState {
	pub site: Arc<AdminSite>,
	pub store: Arc<dyn RecordStore>,
	pub sessions: Arc<dyn SessionBackend>,
	pub introspector: Arc<dyn FieldIntrospector>,
	pub converter: Arc<dyn ReportConverter>,
	pub config: ExportConfig,
}

impl ExportState {
	/// State with the schema-backed introspector and the default converter
	pub fn new(
		site: Arc<AdminSite>,
		store: Arc<dyn RecordStore>,
		sessions: Arc<dyn SessionBackend>,
	) -> Self {
		let apps = site.apps().clone();
		Self {
			introspector: Arc::new(ModelIntrospector::new(apps.clone())),
			converter: Arc::new(DefaultReportConverter::new(apps, store.clone())),
			site,
			store,
			sessions,
			config: ExportConfig::default(),
		}
	}

	pub fn with_converter(mut self, converter: Arc<dyn ReportConverter>) -> Self {
		self.converter = converter;
		self
	}

	pub fn with_config(mut self, config: ExportConfig) -> Self {
		self.config = config;
		self
	}

	/// Load the request's session
	pub(crate) async fn session(&self, request: &Request) -> AdminResult<Session> {
		Session::from_request(request, &self.config.session_cookie_name, self.sessions.clone()).await
	}
}

/// Reject users who may not use the admin console
pub(crate) fn require_staff(user: &User) -> AdminResult<()> {
	if user.is_active_staff() {
		Ok(())
	} else {
		Err(AdminError::PermissionDenied(
			"staff member login required".to_string(),
		))
	}
}

/// Numeric content type id from a query parameter
pub(crate) fn content_type_param(request: &Request, name: &str) -> AdminResult<ContentTypeId> {
	let raw = request
		.query(name)
		.ok_or_else(|| AdminError::MissingParameter(name.to_string()))?;
	raw.trim()
		.parse()
		.map_err(|_| AdminError::InvalidParameter(format!("{} must be a content type id", name)))
}

/// Primary keys from `session_key` or `ids`, in that order of preference
pub(crate) fn record_ids(request: &Request, session: &Session) -> AdminResult<Vec<String>> {
	if let Some(key) = request.query_non_empty("session_key") {
		return session.get_ids(key);
	}
	request
		.query("ids")
		.map(split_ids)
		.ok_or_else(|| AdminError::MissingParameter("ids".to_string()))
}

/// `ct` and the request's id source, encoded for a query string
pub(crate) fn selection_query(request: &Request, ct: ContentTypeId) -> AdminResult<String> {
	let ct = ct.to_string();
	let source = match request.query_non_empty("session_key") {
		Some(key) => ("session_key", key),
		None => ("ids", request.query("ids").unwrap_or("")),
	};
	serde_urlencoded::to_string([("ct", ct.as_str()), source])
		.map_err(|e| AdminError::InvalidParameter(e.to_string()))
}

/// Serialize into a JSON object for template contexts
pub(crate) fn to_map(value: impl Serialize) -> AdminResult<Map<String, Value>> {
	match serde_json::to_value(value) {
		Ok(Value::Object(map)) => Ok(map),
		Ok(_) => Ok(Map::new()),
		Err(e) => Err(AdminError::TemplateError(e.to_string())),
	}
}
