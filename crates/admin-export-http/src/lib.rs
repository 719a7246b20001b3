//! # Admin Export HTTP
//!
//! Request and response types, sessions, the export views and a hyper HTTP/1
//! server for the admin export add-on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use admin_export_core::{AdminSite, InMemoryRecordStore};
//! use admin_export_http::{ExportRouter, ExportState, HttpServer, InMemorySessionBackend};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let site = Arc::new(AdminSite::new("Shop admin"));
//! let state = ExportState::new(
//!     site,
//!     Arc::new(InMemoryRecordStore::new()),
//!     Arc::new(InMemorySessionBackend::new()),
//! );
//!
//! let router = ExportRouter::new(Arc::new(state));
//! HttpServer::new(Arc::new(router))
//!     .listen("127.0.0.1:8000".parse()?)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod session;
pub mod templates;
pub mod views;

pub use handler::Handler;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use router::ExportRouter;
pub use server::HttpServer;
pub use session::{AUTH_USER_KEY, InMemorySessionBackend, Session, SessionBackend, SessionError};
pub use views::{
	DEFAULT_SESSION_IDS_THRESHOLD, EXPORT_MESSAGE_HEADER, ExportConfig, ExportSelectedView,
	ExportState, ExportView, RelatedFieldsView, SESSION_KEY_PREFIX, encode_export_message,
	export_selected_objects,
};
