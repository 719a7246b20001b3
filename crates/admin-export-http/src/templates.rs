//! Selection form templates

use crate::Response;
use admin_export_core::AdminResult;
use std::sync::{Arc, OnceLock};
use tera::{Context, Tera};

/// Field selection form
pub const EXPORT_TEMPLATE: &str = "admin_export/export.html";
/// Drill-down fragment listing fields one relation further
pub const FIELDS_TEMPLATE: &str = "admin_export/fields.html";

static TERA_ENGINE: OnceLock<Arc<Tera>> = OnceLock::new();

fn get_tera_engine() -> &'static Arc<Tera> {
	TERA_ENGINE.get_or_init(|| {
		let mut tera = Tera::default();
		let templates = [
			(
				FIELDS_TEMPLATE,
				include_str!("../templates/admin_export/fields.html"),
			),
			(
				EXPORT_TEMPLATE,
				include_str!("../templates/admin_export/export.html"),
			),
		];
		if let Err(e) = tera.add_raw_templates(templates) {
			tracing::error!(error = %e, "Failed to initialize admin export templates");
		}
		Arc::new(tera)
	})
}

/// Render a template into a `200 OK` HTML response
pub fn render_template(template_name: &str, context: &Context) -> AdminResult<Response> {
	let html = get_tera_engine().render(template_name, context)?;
	Ok(Response::html(html))
}
