//! Error types for admin export

use crate::contenttypes::ContentTypeId;
use thiserror::Error;

/// Admin export error type
#[derive(Debug, Error)]
pub enum AdminError {
	/// No content type with this id exists
	#[error("ContentType {0} does not exist")]
	ContentTypeNotFound(ContentTypeId),

	/// Content type exists but its model has no admin registration
	#[error("Model '{0}' is not registered with admin")]
	ModelNotRegistered(String),

	/// A required query or form parameter is absent
	#[error("Missing required parameter: {0}")]
	MissingParameter(String),

	/// A parameter is present but malformed
	#[error("Invalid parameter: {0}")]
	InvalidParameter(String),

	/// `session_key` names nothing in the current session
	#[error("No value stored in session under '{0}'")]
	SessionValueNotFound(String),

	/// Permission denied
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Record store error
	#[error("Record store error: {0}")]
	StoreError(String),

	/// Template rendering error
	#[error("Template rendering error: {0}")]
	TemplateError(String),

	/// CSV or spreadsheet writer error
	#[error("Export error: {0}")]
	ExportError(String),
}

impl AdminError {
	/// HTTP status code this error maps to
	///
	/// # Examples
	///
	/// ```
	/// use admin_export_core::AdminError;
	///
	/// assert_eq!(AdminError::ContentTypeNotFound(7).status_code(), 404);
	/// assert_eq!(AdminError::MissingParameter("ids".into()).status_code(), 400);
	/// assert_eq!(AdminError::StoreError("boom".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			AdminError::ContentTypeNotFound(_) | AdminError::ModelNotRegistered(_) => 404,
			AdminError::MissingParameter(_)
			| AdminError::InvalidParameter(_)
			| AdminError::SessionValueNotFound(_) => 400,
			AdminError::PermissionDenied(_) => 403,
			AdminError::StoreError(_) | AdminError::TemplateError(_) | AdminError::ExportError(_) => {
				500
			}
		}
	}

	/// Message safe to show to a client
	///
	/// Internal details of 500-class errors are hidden.
	pub fn client_message(&self) -> String {
		match self {
			AdminError::StoreError(_) => "Record store operation failed".to_string(),
			AdminError::TemplateError(_) => "Template rendering failed".to_string(),
			AdminError::ExportError(_) => "Export failed".to_string(),
			other => other.to_string(),
		}
	}

	/// Whether this error is a server-side failure
	pub fn is_server_error(&self) -> bool {
		self.status_code() >= 500
	}
}

impl From<csv::Error> for AdminError {
	fn from(err: csv::Error) -> Self {
		AdminError::ExportError(format!("CSV: {}", err))
	}
}

impl From<rust_xlsxwriter::XlsxError> for AdminError {
	fn from(err: rust_xlsxwriter::XlsxError) -> Self {
		AdminError::ExportError(format!("XLSX: {}", err))
	}
}

impl From<tera::Error> for AdminError {
	fn from(err: tera::Error) -> Self {
		AdminError::TemplateError(err.to_string())
	}
}

/// Result type for admin export operations
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(AdminError::ContentTypeNotFound(3), 404)]
	#[case(AdminError::ModelNotRegistered("shop.customer".into()), 404)]
	#[case(AdminError::MissingParameter("ct".into()), 400)]
	#[case(AdminError::InvalidParameter("ct".into()), 400)]
	#[case(AdminError::SessionValueNotFound("k".into()), 400)]
	#[case(AdminError::PermissionDenied("nope".into()), 403)]
	#[case(AdminError::TemplateError("bad".into()), 500)]
	fn test_status_codes(#[case] err: AdminError, #[case] status: u16) {
		assert_eq!(err.status_code(), status);
	}

	#[test]
	fn test_store_error_hides_details() {
		let err = AdminError::StoreError("connection refused at 10.0.0.3".into());
		let message = err.client_message();

		assert_eq!(message, "Record store operation failed");
		assert!(!message.contains("10.0.0.3"));
		assert!(err.is_server_error());
	}

	#[test]
	fn test_client_message_keeps_client_errors() {
		let err = AdminError::ModelNotRegistered("shop.customer".into());
		assert_eq!(
			err.client_message(),
			"Model 'shop.customer' is not registered with admin"
		);
		assert!(!err.is_server_error());
	}
}
