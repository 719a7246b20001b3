//! Registry, introspection, conversion and renderers.
//!
//! # Examples
//!
//! ```rust
//! use admin_export::core::{ExportFormat, RelationPath};
//!
//! assert_eq!(ExportFormat::from_param(Some("csv")), ExportFormat::Csv);
//! assert_eq!(RelationPath::parse("address.country").to_string(), "address.country");
//! ```

pub use admin_export_core::*;
