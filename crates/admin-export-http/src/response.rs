//! HTTP response

use admin_export_core::{AdminError, AdminResult, ExportResult};
use bytes::Bytes;
use hyper::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName, HeaderValue, LOCATION};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use admin_export_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// `302 Found` pointing at `location`
	pub fn temporary_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_location(location.as_ref())
	}

	/// `200 OK` HTML page
	pub fn html(body: impl Into<Bytes>) -> Self {
		Self::ok()
			.with_header(CONTENT_TYPE.as_str(), "text/html; charset=utf-8")
			.with_body(body)
	}

	/// `200 OK` carrying an export, as an attachment when the format asks for it
	pub fn export(result: ExportResult, attachment: bool) -> Self {
		let mut response = Self::ok().with_header(CONTENT_TYPE.as_str(), &result.mime_type);
		if attachment {
			response = response.with_header(
				CONTENT_DISPOSITION.as_str(),
				&format!("attachment; filename=\"{}\"", result.filename),
			);
		}
		response.with_body(result.data)
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set a header, ignoring names or values that are not valid HTTP
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	/// Set a header, failing on names or values that are not valid HTTP
	///
	/// # Examples
	///
	/// ```
	/// use admin_export_http::Response;
	///
	/// let response = Response::ok().try_header("x-note", "ok").unwrap();
	/// assert_eq!(response.header("x-note"), Some("ok"));
	/// assert!(Response::ok().try_header("x-note", "line\nbreak").is_err());
	/// ```
	pub fn try_header(mut self, name: &str, value: &str) -> AdminResult<Self> {
		let header_name = HeaderName::from_bytes(name.as_bytes())
			.map_err(|e| AdminError::ExportError(format!("header name {}: {}", name, e)))?;
		let header_value = HeaderValue::from_str(value)
			.map_err(|e| AdminError::ExportError(format!("header {}: {}", name, e)))?;
		self.headers.insert(header_name, header_value);
		Ok(self)
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(LOCATION, value);
		}
		self
	}

	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self, serde_json::Error> {
		let json = serde_json::to_vec(data)?;
		self.body = Bytes::from(json);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	/// Header value as a string
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Body as UTF-8 text, lossy
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl From<AdminError> for Response {
	fn from(error: AdminError) -> Self {
		if error.is_server_error() {
			tracing::error!(error = %error, "Request failed");
		} else {
			tracing::warn!(error = %error, "Request rejected");
		}

		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = serde_json::json!({
			"error": error.client_message(),
		});

		Response::new(status)
			.with_json(&body)
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}
