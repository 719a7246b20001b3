//! Settings and fixture loading.

#[cfg(feature = "server")]
pub use admin_export_conf::*;
