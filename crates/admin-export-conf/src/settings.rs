//! Server settings
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with [`ENV_PREFIX`].

use admin_export_http::{DEFAULT_SESSION_IDS_THRESHOLD, ExportConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "ADMIN_EXPORT_";

/// Error type for settings loading
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },
}

impl SettingsError {
	fn invalid(key: &str, message: impl Into<String>) -> Self {
		SettingsError::InvalidValue {
			key: key.to_string(),
			message: message.into(),
		}
	}
}

/// Settings of the export server
///
/// # Examples
///
/// ```
/// use admin_export_conf::Settings;
///
/// let settings = Settings::from_toml_str("url_prefix = \"/admin/export\"").unwrap();
/// assert_eq!(settings.url_prefix, "/admin/export");
/// assert_eq!(settings.bind, "127.0.0.1:8000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	/// Listen address
	pub bind: String,
	/// Mount point of the export views
	pub url_prefix: String,
	pub session_cookie_name: String,
	/// Selections larger than this are passed through the session
	pub session_ids_threshold: usize,
	/// JSON fixture file with models, records and sessions
	pub fixtures: Option<PathBuf>,
	/// `tracing` filter directive
	pub log: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			bind: "127.0.0.1:8000".to_string(),
			url_prefix: "/export".to_string(),
			session_cookie_name: "sessionid".to_string(),
			session_ids_threshold: DEFAULT_SESSION_IDS_THRESHOLD,
			fixtures: None,
			log: "info".to_string(),
		}
	}
}

impl Settings {
	/// Defaults, then `path` if given, then the process environment
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.with_env(std::env::vars())
	}

	/// Parse a TOML settings file
	///
	/// A relative `fixtures` path is resolved against the file's directory.
	pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
		let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let mut settings = Self::from_toml_str(&content)?;

		if let Some(fixtures) = &settings.fixtures
			&& fixtures.is_relative()
			&& let Some(dir) = path.parent()
		{
			settings.fixtures = Some(dir.join(fixtures));
		}

		tracing::debug!(path = %path.display(), "Loaded settings file");
		Ok(settings)
	}

	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Apply `ADMIN_EXPORT_*` overrides from `vars`
	///
	/// Variables without the prefix or with an unknown name are ignored.
	pub fn with_env<I, K, V>(mut self, vars: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		for (name, value) in vars {
			let Some(key) = name.as_ref().strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let value = value.into();
			match key {
				"BIND" => self.bind = value,
				"URL_PREFIX" => self.url_prefix = value,
				"SESSION_COOKIE_NAME" => self.session_cookie_name = value,
				"SESSION_IDS_THRESHOLD" => {
					self.session_ids_threshold = value.trim().parse().map_err(|_| {
						SettingsError::invalid(
							"ADMIN_EXPORT_SESSION_IDS_THRESHOLD",
							format!("'{}' is not a non-negative integer", value),
						)
					})?;
				}
				"FIXTURES" => {
					self.fixtures = (!value.is_empty()).then(|| PathBuf::from(value));
				}
				"LOG" => self.log = value,
				_ => continue,
			}
			tracing::debug!(key, "Applied environment override");
		}

		self.validate()?;
		Ok(self)
	}

	/// Check cross-field constraints
	pub fn validate(&self) -> Result<(), SettingsError> {
		self.bind_addr()?;
		if !self.url_prefix.starts_with('/') {
			return Err(SettingsError::invalid(
				"url_prefix",
				format!("'{}' must start with '/'", self.url_prefix),
			));
		}
		let cookie = &self.session_cookie_name;
		if cookie.is_empty() || cookie.contains(|c: char| c.is_whitespace() || c == ';' || c == '=') {
			return Err(SettingsError::invalid(
				"session_cookie_name",
				format!("'{}' is not a valid cookie name", cookie),
			));
		}
		Ok(())
	}

	pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
		self.bind
			.parse()
			.map_err(|_| SettingsError::invalid("bind", format!("'{}' is not a socket address", self.bind)))
	}

	/// View settings derived from these settings
	pub fn to_export_config(&self) -> ExportConfig {
		let prefix = self.url_prefix.trim_end_matches('/');
		ExportConfig {
			url_prefix: prefix.to_string(),
			session_cookie_name: self.session_cookie_name.clone(),
			session_ids_threshold: self.session_ids_threshold,
		}
	}
}
