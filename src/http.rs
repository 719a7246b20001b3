//! Request and response types, sessions, export views and the HTTP server.

#[cfg(feature = "server")]
pub use admin_export_http::*;
