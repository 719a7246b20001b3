//! HTML renderer
//!
//! Produces a minimal standalone document with one table. Cell text is escaped
//! and embedded newlines become `<br>`.

use super::{ExportFormat, ExportResult};
use crate::error::AdminResult;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tera::{Context, Tera, Value};

const TEMPLATE_NAME: &str = "admin_export/table.html";

/// Fixed export document
pub const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{{ title }}</title>
</head>
<body>
    <h1>{{ title }}</h1>
    <table border=1>
    {% if header %}<thead><tr>{% for h in header %}<th>{{ h }}</th>{% endfor %}</tr></thead>{% endif %}
    <tbody>
        {% for datum in data %}
        <tr>{% for cell in datum %}<td>{{ cell | linebreaksbr | safe }}</td>{% endfor %}</tr>
        {% endfor %}
    </tbody>
    </table>
</body>
</html>
"#;

static TERA_ENGINE: OnceLock<Arc<Tera>> = OnceLock::new();

fn get_tera_engine() -> &'static Arc<Tera> {
	TERA_ENGINE.get_or_init(|| {
		let mut tera = Tera::default();
		tera.register_filter("linebreaksbr", linebreaksbr);
		if let Err(e) = tera.add_raw_template(TEMPLATE_NAME, HTML_TEMPLATE) {
			tracing::error!(error = %e, "Failed to compile HTML export template");
		}
		Arc::new(tera)
	})
}

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use admin_export_core::export::html::escape_html;
///
/// assert_eq!(escape_html("<b>Tom & 'Jerry'</b>"), "&lt;b&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
	let mut escaped = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'&' => escaped.push_str("&amp;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Tera filter: escape, then turn each line break into `<br>`
///
/// Non-string values are rendered with their JSON text first.
pub fn linebreaksbr(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
	let text = match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	};
	let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
	Ok(Value::String(escape_html(&normalized).replace('\n', "<br>")))
}

/// Render rows into the fixed HTML document
pub fn render(rows: &[Vec<String>], header: &[String], title: &str) -> AdminResult<ExportResult> {
	let mut context = Context::new();
	context.insert("title", title);
	context.insert("header", header);
	context.insert("data", rows);

	let html = get_tera_engine().render(TEMPLATE_NAME, &context)?;

	Ok(ExportResult::new(
		html.into_bytes(),
		ExportFormat::Html.mime_type(),
		format!("export.{}", ExportFormat::Html.extension()),
		rows.len(),
	))
}
