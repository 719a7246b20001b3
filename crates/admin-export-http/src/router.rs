//! Export URL routing
//!
//! Routes under the configured prefix:
//!
//! - `{prefix}/` selection form and export
//! - `{prefix}/related/` related-fields fragment
//! - `{prefix}/selected/` export-selected action
//!
//! The router is the error boundary: view errors become JSON error responses.

use crate::views::{ExportState, ExportSelectedView, ExportView, RelatedFieldsView};
use crate::{Handler, Request, Response};
use admin_export_core::AdminResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Dispatches requests to the export views
pub struct ExportRouter {
	prefix: String,
	export: ExportView,
	related: RelatedFieldsView,
	selected: ExportSelectedView,
}

impl ExportRouter {
	pub fn new(state: Arc<ExportState>) -> Self {
		Self {
			prefix: state.config.url_prefix.trim_end_matches('/').to_string(),
			export: ExportView::new(state.clone()),
			related: RelatedFieldsView::new(state.clone()),
			selected: ExportSelectedView::new(state),
		}
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	fn route(&self, path: &str) -> Option<&dyn Handler> {
		let rest = path.strip_prefix(self.prefix.as_str())?;
		match rest.trim_end_matches('/') {
			"" => Some(&self.export as &dyn Handler),
			"/related" => Some(&self.related),
			"/selected" => Some(&self.selected),
			_ => None,
		}
	}
}

#[async_trait]
impl Handler for ExportRouter {
	async fn handle(&self, request: Request) -> AdminResult<Response> {
		let method = request.method.clone();
		let path = request.path().to_string();

		let response = match self.route(&path) {
			Some(handler) => handler
				.handle(request)
				.await
				.unwrap_or_else(Response::from),
			None => Response::not_found()
				.with_json(&serde_json::json!({ "error": "Not Found" }))
				.unwrap_or_else(|_| Response::not_found()),
		};

		tracing::debug!(method = %method, path = %path, status = response.status.as_u16(), "Handled request");
		Ok(response)
	}
}
