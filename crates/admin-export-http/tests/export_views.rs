//! Export view integration tests
//!
//! Drives the router with in-memory stores and sessions.
//!
//! # Test Categories
//!
//! - Happy path: selection form, relation drill-down links, CSV, HTML and spreadsheet exports
//! - Messages: converter notices carried in an encoded response header
//! - Error path: unknown or unregistered content types, missing ids, non-staff users, refusing admins
//! - Dispatch: `related` flag, export-selected redirects

use admin_export_core::{
	AdminResult, AdminSite, FieldKind, FieldMeta, InMemoryRecordStore, ModelAdmin,
	ModelAdminConfig, ModelMeta, Record, RecordSet, RecordStore, ReportConverter, ReportOutcome,
	User,
};
use admin_export_http::{
	ExportConfig, ExportRouter, ExportState, Handler, InMemorySessionBackend, Request, Response,
	SessionBackend,
};
use async_trait::async_trait;
use hyper::{Method, StatusCode};
use percent_encoding::percent_decode_str;
use rstest::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const STAFF_SESSION: &str = "staff-session";
const CLERK_SESSION: &str = "clerk-session";
const GUEST_SESSION: &str = "guest-session";

/// Record store counting every query
#[derive(Default)]
struct CountingStore {
	inner: InMemoryRecordStore,
	queries: AtomicUsize,
}

impl CountingStore {
	fn queries(&self) -> usize {
		self.queries.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl RecordStore for CountingStore {
	async fn filter_pks(&self, model: &str, pk_field: &str, pks: &[String]) -> AdminResult<Vec<Record>> {
		self.queries.fetch_add(1, Ordering::SeqCst);
		self.inner.filter_pks(model, pk_field, pks).await
	}

	async fn get(&self, model: &str, pk_field: &str, pk: &str) -> AdminResult<Option<Record>> {
		self.queries.fetch_add(1, Ordering::SeqCst);
		self.inner.get(model, pk_field, pk).await
	}

	async fn filter_by(&self, model: &str, field: &str, value: &str) -> AdminResult<Vec<Record>> {
		self.queries.fetch_add(1, Ordering::SeqCst);
		self.inner.filter_by(model, field, value).await
	}
}

struct App {
	router: ExportRouter,
	store: Arc<CountingStore>,
	sessions: Arc<InMemorySessionBackend>,
	customer_ct: i64,
	address_ct: i64,
	unregistered_ct: i64,
}

impl App {
	async fn send(&self, request: Request) -> Response {
		self.router.handle(request).await.unwrap()
	}

	async fn get(&self, uri: &str, session: &str) -> Response {
		self.send(
			Request::builder()
				.method(Method::GET)
				.uri(uri)
				.header("cookie", &format!("sessionid={}", session))
				.build()
				.unwrap(),
		)
		.await
	}

	async fn post(&self, uri: &str, session: &str, form: &[(&str, &str)]) -> Response {
		self.send(
			Request::builder()
				.method(Method::POST)
				.uri(uri)
				.header("cookie", &format!("sessionid={}", session))
				.form(form)
				.build()
				.unwrap(),
		)
		.await
	}
}

/// First `href` containing `needle`, with HTML entities for `&` undone
fn link_with(html: &str, needle: &str) -> String {
	html.split("href=\"")
		.skip(1)
		.filter_map(|rest| rest.split('"').next())
		.find(|href| href.contains(needle))
		.unwrap()
		.replace("&amp;", "&")
}

/// Markup of the POST form
fn post_form(html: &str) -> &str {
	let start = html.find("<form method=\"post\"").unwrap();
	let end = start + html[start..].find("</form>").unwrap();
	&html[start..end]
}

/// Admin refusing every user
struct LockedAdmin(ModelAdminConfig);

#[async_trait]
impl ModelAdmin for LockedAdmin {
	fn meta(&self) -> &Arc<ModelMeta> {
		self.0.meta()
	}

	async fn has_view_permission(&self, _user: &User) -> bool {
		false
	}
}

/// Converter filling every cell and reporting a multi-line notice
struct NoticeConverter;

#[async_trait]
impl ReportConverter for NoticeConverter {
	async fn report_to_list(
		&self,
		records: &RecordSet,
		fields: &[String],
		_user: &User,
	) -> AdminResult<ReportOutcome> {
		Ok(ReportOutcome {
			rows: records
				.records
				.iter()
				.map(|_| fields.iter().map(|_| "x".to_string()).collect())
				.collect(),
			message: Some("Skipped 1 row:\nbad encoding".to_string()),
		})
	}
}

// =============================================================================
// Test Fixtures
// =============================================================================

async fn build_app(config: ExportConfig) -> App {
	let site = Arc::new(AdminSite::new("Shop admin"));
	let customer = site.register_meta(
		ModelMeta::new("shop", "Customer")
			.with_field(FieldMeta::new("id", FieldKind::Integer))
			.with_field(FieldMeta::new("name", FieldKind::Text))
			.with_field(FieldMeta::new("email", FieldKind::Text))
			.with_field(FieldMeta::new(
				"address",
				FieldKind::ForeignKey {
					to: "shop.address".into(),
				},
			))
			.with_property("display_name"),
	);
	let address = site.register_meta(
		ModelMeta::new("shop", "Address")
			.with_field(FieldMeta::new("city", FieldKind::Text))
			.with_field(FieldMeta::new(
				"country",
				FieldKind::ForeignKey {
					to: "geo.country".into(),
				},
			)),
	);
	let country = site
		.apps()
		.register_model(ModelMeta::new("geo", "Country").with_field(FieldMeta::new("code", FieldKind::Text)));

	let store = Arc::new(CountingStore::default());
	store
		.inner
		.insert("shop.address", Record::new().with("id", 1).with("city", "Paris"));
	for (id, name, email) in [
		(1, "Ada\nLovelace", "ada@example.com"),
		(2, "<b>Bo</b> & Co", "bo@example.com"),
		(3, "Cy", "cy@example.com"),
		(4, "Di", "di@example.com"),
	] {
		store.inner.insert(
			"shop.customer",
			Record::new()
				.with("id", id)
				.with("name", name)
				.with("email", email)
				.with("address", 1),
		);
	}

	let sessions = Arc::new(InMemorySessionBackend::new());
	sessions
		.save(
			STAFF_SESSION,
			&json!({
				"_auth_user": {"username": "root", "is_staff": true, "is_superuser": true},
				"admin_export_saved": ["2", "4"],
			}),
		)
		.await
		.unwrap();
	sessions
		.save(
			CLERK_SESSION,
			&json!({"_auth_user": {"username": "clerk", "is_staff": true, "permissions": []}}),
		)
		.await
		.unwrap();
	sessions
		.save(GUEST_SESSION, &json!({"_auth_user": {"username": "guest"}}))
		.await
		.unwrap();

	let state = ExportState::new(site, store.clone(), sessions.clone()).with_config(config);

	App {
		router: ExportRouter::new(Arc::new(state)),
		store,
		sessions,
		customer_ct: customer.id.unwrap(),
		address_ct: address.id.unwrap(),
		unregistered_ct: country.id.unwrap(),
	}
}

#[fixture]
async fn app() -> App {
	build_app(ExportConfig::default()).await
}

/// Router over a single customer model served by `admin`
async fn single_model_router(
	admin: Arc<dyn ModelAdmin>,
	converter: Option<Arc<dyn ReportConverter>>,
) -> (ExportRouter, i64) {
	let site = Arc::new(AdminSite::new("Shop admin"));
	let ct = site.register(admin).id.unwrap();
	let store = Arc::new(InMemoryRecordStore::new());
	store.insert("shop.customer", Record::new().with("id", 1).with("name", "Ada"));
	let sessions = Arc::new(InMemorySessionBackend::new());
	sessions
		.save(
			STAFF_SESSION,
			&json!({"_auth_user": {"username": "root", "is_staff": true, "is_superuser": true}}),
		)
		.await
		.unwrap();

	let mut state = ExportState::new(site, store, sessions);
	if let Some(converter) = converter {
		state = state.with_converter(converter);
	}
	(ExportRouter::new(Arc::new(state)), ct)
}

fn customer_admin() -> ModelAdminConfig {
	ModelAdminConfig::new(
		ModelMeta::new("shop", "Customer").with_field(FieldMeta::new("name", FieldKind::Text)),
	)
}

fn staff_post(uri: &str, form: &[(&str, &str)]) -> Request {
	Request::builder()
		.method(Method::POST)
		.uri(uri)
		.header("cookie", &format!("sessionid={}", STAFF_SESSION))
		.form(form)
		.build()
		.unwrap()
}

// =============================================================================
// Happy Path Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_get_renders_selection_form(#[future] app: App) {
	let app = app.await;

	// Act
	let response = app
		.get(&format!("/export/?ct={}&ids=1,2", app.customer_ct), STAFF_SESSION)
		.await;

	// Assert
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
	let html = response.text();
	assert!(html.contains("<form method=\"post\""));
	assert!(html.contains("Export 2 customer records"));
	assert!(html.contains("name=\"email\""));
	assert!(html.contains("name=\"display_name\""));
	assert!(html.contains(&format!(
		"href=\"/export/?ct={}&amp;ids=1%2C2&amp;field=address&amp;path=\"",
		app.customer_ct
	)));
}

#[rstest]
#[tokio::test]
async fn test_get_with_field_drills_into_relation(#[future] app: App) {
	let app = app.await;

	let response = app
		.get(
			&format!("/export/?ct={}&ids=1&field=address&path=", app.customer_ct),
			STAFF_SESSION,
		)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	assert!(response.text().contains("name=\"address.city\""));
}

#[rstest]
#[tokio::test]
async fn test_related_link_opens_form_with_related_fields(#[future] app: App) {
	let app = app.await;

	// Arrange
	let page = app
		.get(&format!("/export/?ct={}&ids=1,2", app.customer_ct), STAFF_SESSION)
		.await
		.text();
	let address_link = link_with(&page, "field=address");

	// Act
	let drilled = app.get(&address_link, STAFF_SESSION).await;

	// Assert
	assert_eq!(drilled.status, StatusCode::OK);
	let html = drilled.text();
	let form = post_form(&html);
	assert!(form.contains("name=\"address.city\""));
	assert!(html.contains("Export 2 customer records"));

	let country_link = link_with(&html, "field=country");
	assert!(country_link.ends_with("&path=address"));
	let second_hop = app.get(&country_link, STAFF_SESSION).await.text();
	assert!(post_form(&second_hop).contains("name=\"address.country.code\""));

	let export = app
		.post(&address_link, STAFF_SESSION, &[("address.city", "on"), ("__format", "csv")])
		.await;
	assert_eq!(export.text(), "address.city\nParis\nParis\n");
}

#[rstest]
#[tokio::test]
async fn test_related_link_keeps_session_key(#[future] app: App) {
	let app = app.await;

	let page = app
		.get(
			&format!("/export/?ct={}&session_key=admin_export_saved", app.customer_ct),
			STAFF_SESSION,
		)
		.await
		.text();
	let link = link_with(&page, "field=address");

	assert!(link.contains("session_key=admin_export_saved"));
	assert!(!link.contains("ids="));
	let drilled = app.get(&link, STAFF_SESSION).await.text();
	assert!(drilled.contains("Export 2 customer records"));
}

#[rstest]
#[tokio::test]
async fn test_post_csv_rows_follow_field_order(#[future] app: App) {
	let app = app.await;

	// Act
	let response = app
		.post(
			&format!("/export/?ct={}&ids=1,2,3", app.customer_ct),
			STAFF_SESSION,
			&[
				("email", "on"),
				("name", "on"),
				("address.city", "on"),
				("email", "on"),
				("id", "off"),
				("__format", "csv"),
			],
		)
		.await;

	// Assert
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.header("content-type"), Some("text/csv; charset=UTF-8"));
	assert!(response.header("content-disposition").is_none());

	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.from_reader(response.body.as_ref());
	let rows: Vec<Vec<String>> = reader
		.records()
		.map(|r| r.unwrap().iter().map(str::to_string).collect())
		.collect();

	assert_eq!(rows.len(), 4);
	assert_eq!(rows[0], vec!["email", "name", "address.city"]);
	assert_eq!(rows[1], vec!["ada@example.com", "Ada\nLovelace", "Paris"]);
	assert!(rows.iter().all(|row| row.len() == 3));
}

#[rstest]
#[tokio::test]
async fn test_post_csv_without_fields_has_no_header(#[future] app: App) {
	let app = app.await;

	let response = app
		.post(
			&format!("/export/?ct={}&ids=1,2", app.customer_ct),
			STAFF_SESSION,
			&[("__format", "csv")],
		)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	let text = response.text();
	assert!(!text.contains("name"));
	assert!(!text.contains("ada@example.com"));
}

#[rstest]
#[tokio::test]
async fn test_post_html_escapes_and_breaks_lines(#[future] app: App) {
	let app = app.await;

	let response = app
		.post(
			&format!("/export/?ct={}&ids=1,2", app.customer_ct),
			STAFF_SESSION,
			&[("name", "on"), ("__format", "html")],
		)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	let html = response.text();
	assert!(html.contains("<th>name</th>"));
	assert!(html.contains("<td>Ada<br>Lovelace</td>"));
	assert!(html.contains("<td>&lt;b&gt;Bo&lt;/b&gt; &amp; Co</td>"));
}

#[rstest]
#[case(None)]
#[case(Some("xlsx"))]
#[case(Some("pdf"))]
#[tokio::test]
async fn test_post_defaults_to_spreadsheet(#[future] app: App, #[case] format: Option<&str>) {
	let app = app.await;
	let mut form = vec![("name", "on")];
	if let Some(format) = format {
		form.push(("__format", format));
	}

	let response = app
		.post(&format!("/export/?ct={}&ids=1", app.customer_ct), STAFF_SESSION, &form)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(
		response.header("content-type"),
		Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
	);
	let disposition = response.header("content-disposition").unwrap();
	assert!(disposition.starts_with("attachment; filename=\"customer_"));
	assert!(disposition.ends_with(".xlsx\""));
	assert!(response.body.starts_with(b"PK"));
}

#[rstest]
#[tokio::test]
async fn test_session_key_selects_stored_ids(#[future] app: App) {
	let app = app.await;

	let response = app
		.post(
			&format!("/export/?ct={}&session_key=admin_export_saved", app.customer_ct),
			STAFF_SESSION,
			&[("id", "on"), ("__format", "csv")],
		)
		.await;

	assert_eq!(response.text(), "id\n2\n4\n");
}

#[rstest]
#[tokio::test]
async fn test_unknown_field_surfaces_message(#[future] app: App) {
	let app = app.await;

	let response = app
		.post(
			&format!("/export/?ct={}&ids=3", app.customer_ct),
			STAFF_SESSION,
			&[("name", "on"), ("nickname", "on"), ("__format", "csv")],
		)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(
		response.header("x-export-message"),
		Some("Error: Unknown field nickname.")
	);
	assert_eq!(response.text(), "name,nickname\nCy,\n");
}

#[rstest]
#[tokio::test]
async fn test_non_ascii_message_is_percent_encoded(#[future] app: App) {
	let app = app.await;

	let response = app
		.post(
			&format!("/export/?ct={}&ids=3", app.customer_ct),
			STAFF_SESSION,
			&[("name", "on"), ("pr\u{e9}nom", "on"), ("__format", "csv")],
		)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	let header = response.header("x-export-message").unwrap();
	assert_eq!(header, "Error: Unknown field pr%C3%A9nom.");
	assert_eq!(
		percent_decode_str(header).decode_utf8().unwrap(),
		"Error: Unknown field pr\u{e9}nom."
	);
	assert_eq!(response.text(), "name,pr\u{e9}nom\nCy,\n");
}

#[rstest]
#[tokio::test]
async fn test_custom_converter_message_with_line_break() {
	let (router, ct) =
		single_model_router(Arc::new(customer_admin()), Some(Arc::new(NoticeConverter))).await;

	let response = router
		.handle(staff_post(
			&format!("/export/?ct={}&ids=1", ct),
			&[("name", "on"), ("__format", "csv")],
		))
		.await
		.unwrap();

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.text(), "name\nx\n");
	let header = response.header("x-export-message").unwrap();
	assert_eq!(header, "Skipped 1 row:%0Abad encoding");
	assert_eq!(
		percent_decode_str(header).decode_utf8().unwrap(),
		"Skipped 1 row:\nbad encoding"
	);
}

// =============================================================================
// Dispatch Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_related_flag_never_renders_form(#[future] app: App) {
	let app = app.await;

	let response = app
		.get(
			&format!(
				"/export/?ct={ct}&ids=1&related=1&model_ct={ct}&field=address&path=",
				ct = app.customer_ct
			),
			STAFF_SESSION,
		)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	let html = response.text();
	assert!(!html.contains("<form"));
	assert!(html.contains("name=\"address.city\""));
	assert!(html.contains(&format!("data-model-ct=\"{}\"", app.address_ct)));
}

#[rstest]
#[tokio::test]
async fn test_related_endpoint_second_hop(#[future] app: App) {
	let app = app.await;

	let response = app
		.get(
			&format!("/export/related/?model_ct={}&field=country&path=address", app.address_ct),
			STAFF_SESSION,
		)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	let html = response.text();
	assert!(html.contains("name=\"address.country.code\""));
	assert!(html.contains("data-path=\"address.country\""));
}

#[rstest]
#[tokio::test]
async fn test_export_selected_inline_ids(#[future] app: App) {
	let app = app.await;

	let response = app
		.post(
			&format!("/export/selected/?ct={}", app.customer_ct),
			STAFF_SESSION,
			&[("_selected_action", "1"), ("_selected_action", "3")],
		)
		.await;

	assert_eq!(response.status, StatusCode::FOUND);
	assert_eq!(
		response.header("location"),
		Some(format!("/export/?ct={}&ids=1%2C3", app.customer_ct).as_str())
	);
}

#[rstest]
#[tokio::test]
async fn test_export_selected_large_selection_uses_session() {
	let app = build_app(ExportConfig {
		session_ids_threshold: 2,
		..ExportConfig::default()
	})
	.await;

	// Arrange
	let form = [
		("_selected_action", "1"),
		("_selected_action", "2"),
		("_selected_action", "3"),
	];

	// Act
	let response = app
		.post(&format!("/export/selected/?ct={}", app.customer_ct), STAFF_SESSION, &form)
		.await;

	// Assert
	assert_eq!(response.status, StatusCode::FOUND);
	let location = response.header("location").unwrap().to_string();
	assert!(location.contains("session_key=admin_export_"));
	assert!(response.header("set-cookie").is_none());

	let follow = app
		.post(&location, STAFF_SESSION, &[("id", "on"), ("__format", "csv")])
		.await;
	assert_eq!(follow.text(), "id\n1\n2\n3\n");
}

// =============================================================================
// Error Path Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_unregistered_model_fails_everywhere(#[future] app: App) {
	let app = app.await;
	let sessions_before = app.sessions.len();
	let ct = app.unregistered_ct;

	let get = app.get(&format!("/export/?ct={}&ids=1", ct), STAFF_SESSION).await;
	let post = app
		.post(&format!("/export/?ct={}&ids=1", ct), STAFF_SESSION, &[("code", "on")])
		.await;
	let related = app
		.get(&format!("/export/related/?model_ct={}&field=x&path=", ct), STAFF_SESSION)
		.await;

	for response in [&get, &post, &related] {
		assert_eq!(response.status, StatusCode::NOT_FOUND);
		let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
		assert!(body["error"].as_str().unwrap().contains("not registered"));
	}
	assert_eq!(app.store.queries(), 0);
	assert_eq!(app.sessions.len(), sessions_before);
}

#[rstest]
#[tokio::test]
async fn test_unknown_content_type(#[future] app: App) {
	let app = app.await;

	let response = app.get("/export/?ct=999&ids=1", STAFF_SESSION).await;

	assert_eq!(response.status, StatusCode::NOT_FOUND);
	assert_eq!(app.store.queries(), 0);
}

#[rstest]
#[case("/export/?ct={ct}")]
#[case("/export/?ct={ct}&session_key=")]
#[tokio::test]
async fn test_missing_ids_fails_before_query(#[future] app: App, #[case] template: &str) {
	let app = app.await;
	let uri = template.replace("{ct}", &app.customer_ct.to_string());

	let response = app.get(&uri, STAFF_SESSION).await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(app.store.queries(), 0);
}

#[rstest]
#[tokio::test]
async fn test_unknown_session_key(#[future] app: App) {
	let app = app.await;

	let response = app
		.get(
			&format!("/export/?ct={}&session_key=admin_export_gone", app.customer_ct),
			STAFF_SESSION,
		)
		.await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(app.store.queries(), 0);
}

#[rstest]
#[case(GUEST_SESSION)]
#[case("no-such-session")]
#[tokio::test]
async fn test_non_staff_rejected(#[future] app: App, #[case] session: &str) {
	let app = app.await;

	let response = app
		.get(&format!("/export/?ct={}&ids=1", app.customer_ct), session)
		.await;

	assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[rstest]
#[tokio::test]
async fn test_converter_denial_is_forbidden(#[future] app: App) {
	let app = app.await;

	let response = app
		.post(
			&format!("/export/?ct={}&ids=1", app.customer_ct),
			CLERK_SESSION,
			&[("name", "on"), ("__format", "csv")],
		)
		.await;

	assert_eq!(response.status, StatusCode::FORBIDDEN);
	let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
	assert_eq!(body["error"], "Permission denied: Permission Denied");
}

#[rstest]
#[tokio::test]
async fn test_model_admin_can_refuse_export() {
	let (router, ct) =
		single_model_router(Arc::new(LockedAdmin(customer_admin())), None).await;

	let response = router
		.handle(staff_post(
			&format!("/export/?ct={}&ids=1", ct),
			&[("name", "on"), ("__format", "csv")],
		))
		.await
		.unwrap();

	assert_eq!(response.status, StatusCode::FORBIDDEN);
	assert!(!response.text().contains("Ada"));
}

#[rstest]
#[tokio::test]
async fn test_related_link_for_scalar_field_rejected(#[future] app: App) {
	let app = app.await;

	let response = app
		.get(
			&format!("/export/?ct={}&ids=1&field=country&path=address.city", app.customer_ct),
			STAFF_SESSION,
		)
		.await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn test_related_requires_relation_field(#[future] app: App) {
	let app = app.await;

	let response = app
		.get(
			&format!("/export/related/?model_ct={}&field=name&path=", app.customer_ct),
			STAFF_SESSION,
		)
		.await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[case(Method::GET, "/export/nowhere/", StatusCode::NOT_FOUND)]
#[case(Method::GET, "/elsewhere/", StatusCode::NOT_FOUND)]
#[case(Method::DELETE, "/export/", StatusCode::METHOD_NOT_ALLOWED)]
#[case(Method::GET, "/export/selected/", StatusCode::METHOD_NOT_ALLOWED)]
#[tokio::test]
async fn test_routing(
	#[future] app: App,
	#[case] method: Method,
	#[case] uri: &str,
	#[case] status: StatusCode,
) {
	let app = app.await;

	let response = app
		.send(Request::builder().method(method).uri(uri).build().unwrap())
		.await;

	assert_eq!(response.status, status);
}
