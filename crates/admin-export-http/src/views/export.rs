//! Field selection form and data export

use super::{
	ExportState, RelatedFieldsView, content_type_param, record_ids, require_staff, selection_query,
	to_map,
};
use crate::templates::{EXPORT_TEMPLATE, render_template};
use crate::{Handler, Request, Response, Session};
use admin_export_core::{
	AdminError, AdminResult, ExportBuilder, ExportFormat, FieldInfo, FieldSelectionContext,
	ModelMeta, PERMISSION_DENIED, RecordSet, RelationPath, ResolvedModel,
};
use async_trait::async_trait;
use hyper::Method;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::json;
use std::sync::Arc;

/// Form value marking a field as selected
const SELECTED: &str = "on";
const FORMAT_FIELD: &str = "__format";

/// Header carrying a non-fatal converter message, percent-encoded as UTF-8
pub const EXPORT_MESSAGE_HEADER: &str = "X-Export-Message";

/// Everything GET and POST derive from the query string
struct ExportContext {
	resolved: ResolvedModel,
	records: RecordSet,
	selection: FieldSelectionContext,
	/// Relation path from the query, before following `field`
	path: RelationPath,
	/// Model at the end of `path`
	model: Arc<ModelMeta>,
	/// `ct` plus the id source, for links back into this view
	selection_query: String,
}

/// Characters escaped in message headers, besides all non-ASCII bytes
const HEADER_ESCAPE: &AsciiSet = &CONTROLS.add(b'%');

/// Percent-encode a converter message so it always forms a header value
///
/// Printable ASCII passes through unchanged.
///
/// ```
/// use admin_export_http::encode_export_message;
///
/// assert_eq!(encode_export_message("Unknown field nickname."), "Unknown field nickname.");
/// assert_eq!(encode_export_message("Unknown field pr\u{e9}nom."), "Unknown field pr%C3%A9nom.");
/// ```
pub fn encode_export_message(message: &str) -> String {
	utf8_percent_encode(message, HEADER_ESCAPE).to_string()
}

/// Export view
///
/// GET renders the selection form, POST exports the selected fields.
pub struct ExportView {
	state: Arc<ExportState>,
	related: RelatedFieldsView,
}

impl ExportView {
	pub fn new(state: Arc<ExportState>) -> Self {
		Self {
			related: RelatedFieldsView::new(state.clone()),
			state,
		}
	}

	/// Resolve model, record set and field selection from the query
	///
	/// The id source is checked before the record store is queried.
	async fn context(&self, request: &Request, session: &Session) -> AdminResult<ExportContext> {
		let ct = content_type_param(request, "ct")?;
		self.state.site.apps().resolve_content_type(ct)?;
		let ids = record_ids(request, session)?;
		let resolved = self.state.site.resolve(ct)?;

		tracing::debug!(
			model = %resolved.meta().natural_key(),
			ids = ids.len(),
			"Resolving export record set"
		);
		let records = resolved
			.admin
			.get_queryset(self.state.store.as_ref(), &ids)
			.await?;

		let path = RelationPath::parse(request.query("path").unwrap_or(""));
		let model = self.state.site.apps().model_at(resolved.meta(), &path)?;
		let selection = self.state.introspector.get_fields(
			&model,
			request.query("field").unwrap_or(""),
			&path,
			request.query("path_verbose").unwrap_or(""),
		)?;

		Ok(ExportContext {
			records: RecordSet::new(resolved.content_type.clone(), records),
			selection_query: selection_query(request, ct)?,
			resolved,
			selection,
			path,
			model,
		})
	}

	/// Relations offered for drilling further from the current selection
	fn related_fields(&self, request: &Request, ctx: &ExportContext) -> AdminResult<Vec<FieldInfo>> {
		match request.query_non_empty("field") {
			Some(field) => Ok(self
				.state
				.introspector
				.get_related_fields(&ctx.model, field, &ctx.path)?
				.related_fields),
			None => Ok(self.state.introspector.relation_fields(&ctx.model)),
		}
	}

	async fn get(&self, request: Request) -> AdminResult<Response> {
		let session = self.state.session(&request).await?;
		require_staff(&session.user())?;

		let ctx = self.context(&request, &session).await?;
		let meta = ctx.resolved.meta();
		let pks: Vec<String> = ctx
			.records
			.records
			.iter()
			.filter_map(|record| record.pk(&meta.pk_field))
			.collect();

		let mut data = to_map(json!({
			"opts": {
				"app_label": meta.app_label,
				"model_name": meta.model_name,
				"verbose_name": meta.verbose_name(),
			},
			"count": ctx.records.len(),
			"queryset": pks,
			"model_ct": ctx.resolved.id(),
			"related_fields": self.related_fields(&request, &ctx)?,
			"selection_query": ctx.selection_query,
			"url_prefix": self.state.config.url_prefix,
		}))?;
		data.extend(to_map(&ctx.selection)?);

		let context = tera::Context::from_value(data.into())?;
		render_template(EXPORT_TEMPLATE, &context)
	}

	async fn post(&self, request: Request) -> AdminResult<Response> {
		let session = self.state.session(&request).await?;
		let user = session.user();
		require_staff(&user)?;

		let ctx = self.context(&request, &session).await?;
		if !ctx.resolved.admin.has_view_permission(&user).await {
			return Err(AdminError::PermissionDenied(PERMISSION_DENIED.to_string()));
		}
		let pairs = request.form_pairs()?;

		let mut fields: Vec<String> = Vec::new();
		for (name, value) in &pairs {
			if value == SELECTED && name != FORMAT_FIELD && !fields.contains(name) {
				fields.push(name.clone());
			}
		}
		let format = ExportFormat::from_param(
			pairs
				.iter()
				.rev()
				.find(|(name, _)| name == FORMAT_FIELD)
				.map(|(_, value)| value.as_str()),
		);

		let outcome = self
			.state
			.converter
			.report_to_list(&ctx.records, &fields, &user)
			.await?;

		if let Some(message) = &outcome.message {
			if outcome.rows.is_empty() && !ctx.records.is_empty() {
				return Err(AdminError::PermissionDenied(message.clone()));
			}
			tracing::warn!(user = %user.username, message = %message, "Export completed with warnings");
		}

		let meta = ctx.resolved.meta();
		let result = ExportBuilder::new(&meta.model_name, format)
			.title(meta.verbose_name())
			.header(fields)
			.rows(outcome.rows)
			.build()?;

		tracing::info!(
			user = %user.username,
			model = %meta.natural_key(),
			format = format.extension(),
			rows = result.row_count,
			"Export completed"
		);

		let response = Response::export(result, format.is_attachment());
		match &outcome.message {
			Some(message) => {
				response.try_header(EXPORT_MESSAGE_HEADER, &encode_export_message(message))
			}
			None => Ok(response),
		}
	}
}

#[async_trait]
impl Handler for ExportView {
	async fn handle(&self, request: Request) -> AdminResult<Response> {
		match request.method {
			Method::GET if request.query_non_empty("related").is_some() => {
				self.related.handle(request).await
			}
			Method::GET => self.get(request).await,
			Method::POST => self.post(request).await,
			_ => Ok(Response::method_not_allowed().with_header("allow", "GET, POST")),
		}
	}
}
