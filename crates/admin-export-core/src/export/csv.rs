//! CSV renderer

use super::{ExportFormat, ExportResult};
use crate::error::{AdminError, AdminResult};
use ::csv::WriterBuilder;

/// Write the header (when non-empty) then one record per row
///
/// The title is not part of CSV output.
pub fn render(rows: &[Vec<String>], header: &[String], _title: &str) -> AdminResult<ExportResult> {
	let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

	if !header.is_empty() {
		writer.write_record(header)?;
	}
	for row in rows {
		writer.write_record(row)?;
	}
	writer
		.flush()
		.map_err(|e| AdminError::ExportError(format!("CSV: {}", e)))?;

	let data = writer
		.into_inner()
		.map_err(|e| AdminError::ExportError(format!("CSV: {}", e)))?;

	Ok(ExportResult::new(
		data,
		ExportFormat::Csv.mime_type(),
		format!("export.{}", ExportFormat::Csv.extension()),
		rows.len(),
	))
}
