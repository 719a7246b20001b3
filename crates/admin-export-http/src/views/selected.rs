//! Export-selected admin action

use super::{ExportState, content_type_param, require_staff};
use crate::{Handler, Request, Response, Session};
use admin_export_core::{AdminError, AdminResult, ResolvedModel};
use async_trait::async_trait;
use hyper::Method;
use std::sync::Arc;

/// Prefix of session keys holding large selections
pub const SESSION_KEY_PREFIX: &str = "admin_export_";

const SELECTED_ACTION_FIELD: &str = "_selected_action";

/// Build the export form URL for a selection
///
/// Selections larger than `threshold` are stored in the session and referenced
/// by key; smaller ones travel inline as `ids`.
pub fn export_selected_objects(
	session: &mut Session,
	resolved: &ResolvedModel,
	pks: &[String],
	threshold: usize,
	url_prefix: &str,
) -> AdminResult<String> {
	let (name, value) = if pks.len() > threshold {
		let key = format!("{}{}", SESSION_KEY_PREFIX, uuid::Uuid::new_v4());
		session.set(key.clone(), pks)?;
		tracing::debug!(session_key = %key, ids = pks.len(), "Stored selection in session");
		("session_key", key)
	} else {
		("ids", pks.join(","))
	};

	let ct = resolved.id().to_string();
	let query = serde_urlencoded::to_string([("ct", ct.as_str()), (name, value.as_str())])
		.map_err(|e| AdminError::InvalidParameter(e.to_string()))?;

	Ok(format!("{}/?{}", url_prefix.trim_end_matches('/'), query))
}

/// `POST {prefix}/selected/?ct=<id>` with `_selected_action` pairs
pub struct ExportSelectedView {
	state: Arc<ExportState>,
}

impl ExportSelectedView {
	pub fn new(state: Arc<ExportState>) -> Self {
		Self { state }
	}

	async fn post(&self, request: Request) -> AdminResult<Response> {
		let mut session = self.state.session(&request).await?;
		require_staff(&session.user())?;

		let resolved = self.state.site.resolve(content_type_param(&request, "ct")?)?;
		let pks: Vec<String> = request
			.form_pairs()?
			.into_iter()
			.filter(|(name, value)| name == SELECTED_ACTION_FIELD && !value.is_empty())
			.map(|(_, value)| value)
			.collect();
		if pks.is_empty() {
			return Err(AdminError::MissingParameter(
				SELECTED_ACTION_FIELD.to_string(),
			));
		}

		let location = export_selected_objects(
			&mut session,
			&resolved,
			&pks,
			self.state.config.session_ids_threshold,
			&self.state.config.url_prefix,
		)?;

		let mut response = Response::temporary_redirect(&location);
		if let Some(key) = session.save().await? {
			response = response.with_header(
				"set-cookie",
				&format!(
					"{}={}; Path=/; HttpOnly; SameSite=Lax",
					self.state.config.session_cookie_name, key
				),
			);
		}
		Ok(response)
	}
}

#[async_trait]
impl Handler for ExportSelectedView {
	async fn handle(&self, request: Request) -> AdminResult<Response> {
		match request.method {
			Method::POST => self.post(request).await,
			_ => Ok(Response::method_not_allowed().with_header("allow", "POST")),
		}
	}
}
