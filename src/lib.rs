//! # Admin Export
//!
//! Admin console add-on that exports selected records of a registered model as
//! an HTML table, a CSV file or a spreadsheet.
//!
//! An operator picks records in the admin, chooses which fields to include
//! (following relations with dotted paths such as `address.city`), and
//! downloads the result.
//!
//! ## Feature Flags
//!
//! - `server` (default) - HTTP views, sessions, settings and the hyper server
//!
//! ## Quick Example
//!
//! ```rust
//! use admin_export::prelude::*;
//!
//! let site = AdminSite::new("Shop admin");
//! let ct = site.register_meta(
//!     ModelMeta::new("shop", "Customer")
//!         .with_field(FieldMeta::new("id", FieldKind::Integer))
//!         .with_field(FieldMeta::new("name", FieldKind::Text)),
//! );
//!
//! let resolved = site.resolve(ct.id.unwrap()).unwrap();
//! assert_eq!(resolved.meta().natural_key(), "shop.customer");
//!
//! let result = ExportBuilder::new("Customer", ExportFormat::Csv)
//!     .header(vec!["id".to_string(), "name".to_string()])
//!     .rows(vec![vec!["1".to_string(), "Ada".to_string()]])
//!     .build()
//!     .unwrap();
//! assert_eq!(result.row_count, 1);
//! ```

pub mod conf;
pub mod core;
pub mod http;

/// Commonly used types
pub mod prelude {
	pub use admin_export_core::{
		AdminError, AdminResult, AdminSite, ContentType, DefaultReportConverter, ExportBuilder,
		ExportFormat, ExportResult, FieldKind, FieldMeta, InMemoryRecordStore, ModelAdmin,
		ModelAdminConfig, ModelIntrospector, ModelMeta, Record, RecordStore, RelationPath,
		ReportConverter, User,
	};

	#[cfg(feature = "server")]
	pub use admin_export_conf::{Settings, bootstrap};
	#[cfg(feature = "server")]
	pub use admin_export_http::{
		ExportConfig, ExportRouter, ExportState, Handler, HttpServer, InMemorySessionBackend,
		Request, Response,
	};
}
