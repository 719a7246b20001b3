//! Related-fields drill-down

use super::{ExportState, content_type_param, require_staff, to_map};
use crate::templates::{FIELDS_TEMPLATE, render_template};
use crate::{Handler, Request, Response};
use admin_export_core::{AdminError, AdminResult, RelationPath};
use async_trait::async_trait;
use hyper::Method;
use serde_json::json;
use std::sync::Arc;

/// Fields one relation hop further from `model_ct` along `field`
pub struct RelatedFieldsView {
	state: Arc<ExportState>,
}

impl RelatedFieldsView {
	pub fn new(state: Arc<ExportState>) -> Self {
		Self { state }
	}

	async fn get(&self, request: Request) -> AdminResult<Response> {
		let session = self.state.session(&request).await?;
		require_staff(&session.user())?;

		let resolved = self.state.site.resolve(content_type_param(&request, "model_ct")?)?;
		let field_name = request
			.query("field")
			.ok_or_else(|| AdminError::MissingParameter("field".to_string()))?;
		let path = RelationPath::parse(
			request
				.query("path")
				.ok_or_else(|| AdminError::MissingParameter("path".to_string()))?,
		);

		let meta = resolved.meta();
		let field_data = self
			.state
			.introspector
			.get_fields(meta, field_name, &path, "")?;
		let related = self
			.state
			.introspector
			.get_related_fields(meta, field_name, &path)?;

		tracing::debug!(
			model = %meta.natural_key(),
			field = field_name,
			path = %related.path,
			"Rendering related fields"
		);

		// Later keys win: the field data overrides the related context.
		let mut data = to_map(json!({
			"related_fields": related.related_fields,
			"model_ct": related.content_type.id,
			"path": related.path,
			"field_name": field_name,
			"table": true,
			"url_prefix": self.state.config.url_prefix,
		}))?;
		data.extend(to_map(&field_data)?);

		let context = tera::Context::from_value(data.into())?;
		render_template(FIELDS_TEMPLATE, &context)
	}
}

#[async_trait]
impl Handler for RelatedFieldsView {
	async fn handle(&self, request: Request) -> AdminResult<Response> {
		match request.method {
			Method::GET => self.get(request).await,
			_ => Ok(Response::method_not_allowed().with_header("allow", "GET")),
		}
	}
}
