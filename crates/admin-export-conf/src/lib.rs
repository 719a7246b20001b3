//! # Admin Export Conf
//!
//! Layered settings and fixture loading for the export server.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use admin_export_conf::{Settings, bootstrap};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(Some("admin-export.toml".as_ref()))?;
//! let env = bootstrap(&settings).await?;
//! let router = env.router(&settings);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod settings;

pub use fixtures::{FixtureError, FixtureModel, FixtureRecord, Fixtures, LoadSummary};
pub use settings::{ENV_PREFIX, Settings, SettingsError};

use admin_export_core::{AdminSite, InMemoryRecordStore};
use admin_export_http::{ExportRouter, ExportState, InMemorySessionBackend};
use std::sync::Arc;

/// Site name used for servers built from settings
pub const SITE_NAME: &str = "admin-export";

/// Backends populated from settings
pub struct Environment {
	pub site: Arc<AdminSite>,
	pub store: Arc<InMemoryRecordStore>,
	pub sessions: Arc<InMemorySessionBackend>,
	pub summary: LoadSummary,
}

impl Environment {
	/// View state over these backends
	pub fn export_state(&self, settings: &Settings) -> ExportState {
		ExportState::new(self.site.clone(), self.store.clone(), self.sessions.clone())
			.with_config(settings.to_export_config())
	}

	pub fn router(&self, settings: &Settings) -> ExportRouter {
		ExportRouter::new(Arc::new(self.export_state(settings)))
	}
}

/// Create empty backends and install the configured fixtures, if any
pub async fn bootstrap(settings: &Settings) -> Result<Environment, FixtureError> {
	let site = Arc::new(AdminSite::new(SITE_NAME));
	let store = Arc::new(InMemoryRecordStore::new());
	let sessions = Arc::new(InMemorySessionBackend::new());

	let summary = match &settings.fixtures {
		Some(path) => {
			Fixtures::from_file(path)?
				.install(&site, &store, &sessions)
				.await?
		}
		None => {
			tracing::warn!("No fixtures configured, starting with an empty site");
			LoadSummary::default()
		}
	};

	Ok(Environment {
		site,
		store,
		sessions,
		summary,
	})
}
