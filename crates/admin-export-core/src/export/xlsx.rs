//! Spreadsheet renderer
//!
//! Writes a single worksheet. Every cell is written as a string so the sheet
//! holds the values the CSV renderer would write. Cells longer than
//! [`MAX_CELL_CHARS`] are cut to that length.

use super::{ExportFormat, ExportResult};
use crate::error::AdminResult;
use rust_xlsxwriter::{Format, Workbook};

const MAX_SHEET_NAME: usize = 31;

/// Longest text a spreadsheet cell may hold, in characters
pub const MAX_CELL_CHARS: usize = 32_767;

/// Worksheet name accepted by spreadsheet applications
///
/// # Examples
///
/// ```
/// use admin_export_core::export::xlsx::sheet_name;
///
/// assert_eq!(sheet_name("orders [2024]"), "orders  2024 ");
/// assert_eq!(sheet_name(""), "Sheet1");
/// ```
pub fn sheet_name(title: &str) -> String {
	let cleaned: String = title
		.chars()
		.map(|c| match c {
			'[' | ']' | ':' | '*' | '?' | '/' | '\\' => ' ',
			_ => c,
		})
		.take(MAX_SHEET_NAME)
		.collect();
	let cleaned = cleaned.trim_matches('\'');

	if cleaned.trim().is_empty() {
		"Sheet1".to_string()
	} else {
		cleaned.to_string()
	}
}

/// Cell text cut to [`MAX_CELL_CHARS`]
fn cell_text(cell: &str) -> &str {
	match cell.char_indices().nth(MAX_CELL_CHARS) {
		Some((end, _)) => {
			tracing::warn!(
				chars = cell.chars().count(),
				limit = MAX_CELL_CHARS,
				"Truncating spreadsheet cell"
			);
			&cell[..end]
		}
		None => cell,
	}
}

/// Write the header in bold (when non-empty) then one row per record
pub fn render(rows: &[Vec<String>], header: &[String], title: &str) -> AdminResult<ExportResult> {
	let mut workbook = Workbook::new();
	let bold = Format::new().set_bold();
	let worksheet = workbook.add_worksheet();
	worksheet.set_name(sheet_name(title))?;

	let mut row_index: u32 = 0;
	if !header.is_empty() {
		for (col, name) in header.iter().enumerate() {
			worksheet.write_string_with_format(row_index, col as u16, cell_text(name), &bold)?;
		}
		row_index += 1;
	}

	for row in rows {
		for (col, cell) in row.iter().enumerate() {
			if !cell.is_empty() {
				worksheet.write_string(row_index, col as u16, cell_text(cell))?;
			}
		}
		row_index += 1;
	}
	worksheet.autofit();

	let data = workbook.save_to_buffer()?;

	Ok(ExportResult::new(
		data,
		ExportFormat::Xlsx.mime_type(),
		format!("export.{}", ExportFormat::Xlsx.extension()),
		rows.len(),
	))
}
