//! # Admin Export Core
//!
//! Model registry, field introspection, report conversion and export renderers
//! for the admin export add-on.
//!
//! ## Features
//!
//! - **Content types**: numeric ids naming installed models
//! - **Admin site**: explicit content type id to [`ModelAdmin`] registry
//! - **Introspection**: scalar fields, properties and relations reachable along a
//!   [`RelationPath`]
//! - **Conversion**: records plus selected fields into display rows, with
//!   per-model permission checks
//! - **Renderers**: HTML, CSV and XLSX output
//!
//! ## Quick Start
//!
//! ```rust
//! use admin_export_core::{
//!     AdminSite, DefaultReportConverter, FieldKind, FieldMeta, InMemoryRecordStore,
//!     ModelAdmin, ModelMeta, Record, RecordSet, ReportConverter, User,
//! };
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let site = AdminSite::new("Shop admin");
//! let ct = site.register_meta(
//!     ModelMeta::new("shop", "Customer")
//!         .with_field(FieldMeta::new("id", FieldKind::Integer))
//!         .with_field(FieldMeta::new("name", FieldKind::Text)),
//! );
//!
//! let store = Arc::new(InMemoryRecordStore::new());
//! store.insert("shop.customer", Record::new().with("id", 1).with("name", "Ada"));
//!
//! let resolved = site.resolve(ct.id.unwrap()).unwrap();
//! let records = resolved.admin.get_queryset(store.as_ref(), &["1".to_string()]).await.unwrap();
//! let converter = DefaultReportConverter::new(site.apps().clone(), store.clone());
//! let outcome = converter
//!     .report_to_list(
//!         &RecordSet::new(ct, records),
//!         &["name".to_string()],
//!         &User::superuser("root"),
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(outcome.rows, vec![vec!["Ada".to_string()]]);
//! # });
//! ```

pub mod apps;
pub mod auth;
pub mod contenttypes;
pub mod converter;
pub mod error;
pub mod export;
pub mod introspection;
pub mod model_admin;
pub mod path;
pub mod schema;
pub mod site;
pub mod store;

pub use apps::Apps;
pub use auth::{ContentTypePermission, PermissionAction, User};
pub use contenttypes::{ContentType, ContentTypeId, ContentTypeRegistry};
pub use converter::{DefaultReportConverter, PERMISSION_DENIED, ReportConverter, ReportOutcome, display_value};
pub use error::{AdminError, AdminResult};
pub use export::{ExportBuilder, ExportFormat, ExportResult};
pub use introspection::{
	FieldInfo, FieldIntrospector, FieldSelectionContext, ModelIntrospector, PropertyInfo,
	RelatedFieldsContext,
};
pub use model_admin::{ModelAdmin, ModelAdminConfig};
pub use path::RelationPath;
pub use schema::{Choice, FieldKind, FieldMeta, ModelMeta};
pub use site::{AdminSite, ResolvedModel};
pub use store::{InMemoryRecordStore, Record, RecordSet, RecordStore};
