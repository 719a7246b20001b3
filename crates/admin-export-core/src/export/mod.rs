//! Export renderers
//!
//! Each renderer takes fully materialized rows plus the header and produces an
//! [`ExportResult`]. An empty header means no header row is written.

pub mod csv;
pub mod html;
pub mod xlsx;

use crate::error::AdminResult;
use serde::{Deserialize, Serialize};

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
	/// Standalone HTML table
	Html,
	/// Comma-separated values
	Csv,
	/// Spreadsheet (XLSX)
	Xlsx,
}

impl ExportFormat {
	/// Format named by the `__format` form value
	///
	/// `html` and `csv` select those formats; anything else, including no value,
	/// selects the spreadsheet.
	///
	/// # Examples
	///
	/// ```
	/// use admin_export_core::ExportFormat;
	///
	/// assert_eq!(ExportFormat::from_param(Some("csv")), ExportFormat::Csv);
	/// assert_eq!(ExportFormat::from_param(Some("pdf")), ExportFormat::Xlsx);
	/// assert_eq!(ExportFormat::from_param(None), ExportFormat::Xlsx);
	/// ```
	pub fn from_param(value: Option<&str>) -> Self {
		match value {
			Some("html") => ExportFormat::Html,
			Some("csv") => ExportFormat::Csv,
			_ => ExportFormat::Xlsx,
		}
	}

	/// Get file extension for this format
	pub fn extension(&self) -> &'static str {
		match self {
			ExportFormat::Html => "html",
			ExportFormat::Csv => "csv",
			ExportFormat::Xlsx => "xlsx",
		}
	}

	/// Get MIME type for this format
	pub fn mime_type(&self) -> &'static str {
		match self {
			ExportFormat::Html => "text/html; charset=utf-8",
			ExportFormat::Csv => "text/csv; charset=UTF-8",
			ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
		}
	}

	/// Whether the response is served as a download
	pub fn is_attachment(&self) -> bool {
		matches!(self, ExportFormat::Xlsx)
	}
}

/// Export result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
	/// Exported data as bytes
	pub data: Vec<u8>,
	/// MIME type
	pub mime_type: String,
	/// Suggested filename
	pub filename: String,
	/// Number of data rows exported, header excluded
	pub row_count: usize,
}

impl ExportResult {
	pub fn new(
		data: Vec<u8>,
		mime_type: impl Into<String>,
		filename: impl Into<String>,
		row_count: usize,
	) -> Self {
		Self {
			data,
			mime_type: mime_type.into(),
			filename: filename.into(),
			row_count,
		}
	}

	/// Get data size in bytes
	pub fn size_bytes(&self) -> usize {
		self.data.len()
	}
}

/// Suggested download name, `<model>_<timestamp>.<ext>`
pub fn export_filename(model_name: &str, format: ExportFormat) -> String {
	format!(
		"{}_{}.{}",
		model_name.to_lowercase(),
		chrono::Utc::now().format("%Y%m%d_%H%M%S"),
		format.extension()
	)
}

/// Export builder for fluent API
///
/// # Examples
///
/// ```
/// use admin_export_core::{ExportBuilder, ExportFormat};
///
/// let result = ExportBuilder::new("Customer", ExportFormat::Csv)
///     .header(vec!["id".to_string(), "name".to_string()])
///     .rows(vec![vec!["1".to_string(), "Ada".to_string()]])
///     .build()
///     .unwrap();
///
/// assert_eq!(result.row_count, 1);
/// assert_eq!(result.data, b"id,name\n1,Ada\n");
/// ```
#[derive(Debug, Clone)]
pub struct ExportBuilder {
	model_name: String,
	format: ExportFormat,
	title: String,
	header: Vec<String>,
	rows: Vec<Vec<String>>,
}

impl ExportBuilder {
	pub fn new(model_name: impl Into<String>, format: ExportFormat) -> Self {
		Self {
			model_name: model_name.into(),
			format,
			title: String::new(),
			header: Vec::new(),
			rows: Vec::new(),
		}
	}

	/// Document or sheet title
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	pub fn header(mut self, header: Vec<String>) -> Self {
		self.header = header;
		self
	}

	pub fn rows(mut self, rows: Vec<Vec<String>>) -> Self {
		self.rows = rows;
		self
	}

	/// Build and export
	pub fn build(self) -> AdminResult<ExportResult> {
		let mut result = match self.format {
			ExportFormat::Html => html::render(&self.rows, &self.header, &self.title)?,
			ExportFormat::Csv => csv::render(&self.rows, &self.header, &self.title)?,
			ExportFormat::Xlsx => xlsx::render(&self.rows, &self.header, &self.title)?,
		};
		result.filename = export_filename(&self.model_name, self.format);

		tracing::debug!(
			format = self.format.extension(),
			rows = result.row_count,
			bytes = result.size_bytes(),
			"Rendered export"
		);
		Ok(result)
	}
}
