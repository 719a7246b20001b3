//! HTTP request

use admin_export_core::{AdminError, AdminResult};
use bytes::Bytes;
use hyper::header::COOKIE;
use hyper::{HeaderMap, Method, Uri, Version};
use std::net::SocketAddr;

/// HTTP Request representation
///
/// Query pairs are decoded once at construction and keep their order.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub remote_addr: Option<SocketAddr>,
	query_pairs: Vec<(String, String)>,
}

impl Request {
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		let query_pairs = Self::parse_pairs(uri.query().unwrap_or("").as_bytes());
		Self {
			method,
			uri,
			version,
			headers,
			body,
			remote_addr: None,
			query_pairs,
		}
	}

	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use admin_export_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/export/?ct=1&ids=1%2C2")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/export/");
	/// assert_eq!(request.query("ids"), Some("1,2"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Decode `application/x-www-form-urlencoded` pairs, skipping malformed input
	fn parse_pairs(raw: &[u8]) -> Vec<(String, String)> {
		serde_urlencoded::from_bytes::<Vec<(String, String)>>(raw).unwrap_or_default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Decoded query pairs in URL order
	pub fn query_pairs(&self) -> &[(String, String)] {
		&self.query_pairs
	}

	/// Last value of a query parameter
	pub fn query(&self, name: &str) -> Option<&str> {
		self.query_pairs
			.iter()
			.rev()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Last non-empty value of a query parameter
	pub fn query_non_empty(&self, name: &str) -> Option<&str> {
		self.query(name).filter(|value| !value.is_empty())
	}

	/// Decoded form body pairs in body order
	pub fn form_pairs(&self) -> AdminResult<Vec<(String, String)>> {
		serde_urlencoded::from_bytes::<Vec<(String, String)>>(&self.body)
			.map_err(|e| AdminError::InvalidParameter(format!("form body: {}", e)))
	}

	/// Value of a cookie from the `Cookie` header
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|h| h.to_str().ok())
			.flat_map(|header| header.split(';'))
			.filter_map(|cookie| {
				let (key, value) = cookie.trim().split_once('=')?;
				(key.trim() == name).then(|| value.trim().to_string())
			})
			.next()
	}
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	headers: HeaderMap,
	body: Bytes,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.append(header_name, header_value);
		}
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Form-encoded body built from pairs
	pub fn form(self, pairs: &[(&str, &str)]) -> Self {
		let encoded = serde_urlencoded::to_string(pairs).unwrap_or_default();
		self.header("content-type", "application/x-www-form-urlencoded")
			.body(encoded)
	}

	pub fn build(self) -> AdminResult<Request> {
		let uri: Uri = self
			.uri
			.as_deref()
			.unwrap_or("/")
			.parse()
			.map_err(|e| AdminError::InvalidParameter(format!("uri: {}", e)))?;

		Ok(Request::new(
			self.method.unwrap_or(Method::GET),
			uri,
			Version::HTTP_11,
			self.headers,
			self.body,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_query_pairs_keep_order_and_decode() {
		let request = Request::builder()
			.uri("/export/?path=customer.&path_verbose=Customer+name&ct=3")
			.build()
			.unwrap();

		let keys: Vec<_> = request.query_pairs().iter().map(|(k, _)| k.as_str()).collect();
		assert_eq!(keys, vec!["path", "path_verbose", "ct"]);
		assert_eq!(request.query("path_verbose"), Some("Customer name"));
	}

	#[rstest]
	#[case("/?related=", None)]
	#[case("/?related=1", Some("1"))]
	#[case("/", None)]
	fn test_query_non_empty(#[case] uri: &str, #[case] expected: Option<&str>) {
		let request = Request::builder().uri(uri).build().unwrap();
		assert_eq!(request.query_non_empty("related"), expected);
	}

	#[rstest]
	fn test_form_pairs() {
		let request = Request::builder()
			.method(Method::POST)
			.form(&[("name", "on"), ("__format", "csv"), ("email", "off")])
			.build()
			.unwrap();

		let pairs = request.form_pairs().unwrap();
		assert_eq!(pairs.len(), 3);
		assert_eq!(pairs[0], ("name".to_string(), "on".to_string()));
	}

	#[rstest]
	fn test_cookie_lookup() {
		let request = Request::builder()
			.header("cookie", "csrftoken=abc; sessionid=s3cr3t")
			.build()
			.unwrap();

		assert_eq!(request.cookie("sessionid"), Some("s3cr3t".to_string()));
		assert_eq!(request.cookie("missing"), None);
	}

	#[rstest]
	fn test_invalid_uri() {
		let result = Request::builder().uri("http://[bad").build();
		assert!(matches!(result, Err(AdminError::InvalidParameter(_))));
	}
}
