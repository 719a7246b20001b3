//! Acting user and model permissions

use crate::contenttypes::ContentType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Permission actions on a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionAction {
	View,
	Add,
	Change,
	Delete,
}

impl PermissionAction {
	pub fn as_str(&self) -> &'static str {
		match self {
			PermissionAction::View => "view",
			PermissionAction::Add => "add",
			PermissionAction::Change => "change",
			PermissionAction::Delete => "delete",
		}
	}
}

impl fmt::Display for PermissionAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Permission codename helpers
pub struct ContentTypePermission;

impl ContentTypePermission {
	/// Format a permission codename as `app_label.action_model`
	///
	/// # Examples
	///
	/// ```
	/// use admin_export_core::{ContentType, ContentTypePermission, PermissionAction};
	///
	/// let ct = ContentType::new("shop", "Customer");
	/// assert_eq!(
	///     ContentTypePermission::format(&ct, PermissionAction::View),
	///     "shop.view_customer"
	/// );
	/// ```
	pub fn format(content_type: &ContentType, action: PermissionAction) -> String {
		format!(
			"{}.{}_{}",
			content_type.app_label.to_lowercase(),
			action,
			content_type.model.to_lowercase()
		)
	}
}

fn default_true() -> bool {
	true
}

/// The user on whose behalf an export runs
///
/// Stored in the session under `_auth_user`. A missing entry means an
/// anonymous user with no permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub username: String,
	#[serde(default = "default_true")]
	pub is_active: bool,
	#[serde(default)]
	pub is_staff: bool,
	#[serde(default)]
	pub is_superuser: bool,
	#[serde(default)]
	pub permissions: HashSet<String>,
}

impl User {
	/// Active, non-staff user with no permissions
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			is_active: true,
			is_staff: false,
			is_superuser: false,
			permissions: HashSet::new(),
		}
	}

	/// The anonymous user
	pub fn anonymous() -> Self {
		Self {
			username: String::new(),
			is_active: false,
			is_staff: false,
			is_superuser: false,
			permissions: HashSet::new(),
		}
	}

	/// Active staff superuser
	pub fn superuser(username: impl Into<String>) -> Self {
		Self {
			is_staff: true,
			is_superuser: true,
			..Self::new(username)
		}
	}

	pub fn with_staff(mut self, is_staff: bool) -> Self {
		self.is_staff = is_staff;
		self
	}

	pub fn with_permission(mut self, codename: impl Into<String>) -> Self {
		self.permissions.insert(codename.into());
		self
	}

	pub fn is_anonymous(&self) -> bool {
		self.username.is_empty()
	}

	/// Whether the user may use the admin console at all
	pub fn is_active_staff(&self) -> bool {
		self.is_active && self.is_staff
	}

	/// Check a permission codename
	///
	/// Inactive users have no permissions; active superusers have all of them.
	pub fn has_perm(&self, codename: &str) -> bool {
		if !self.is_active {
			return false;
		}
		self.is_superuser || self.permissions.contains(codename)
	}

	/// Check a model permission for the given action
	pub fn has_model_perm(&self, content_type: &ContentType, action: PermissionAction) -> bool {
		self.has_perm(&ContentTypePermission::format(content_type, action))
	}

	/// `view` or `change` permission on the model
	pub fn can_view_or_change(&self, content_type: &ContentType) -> bool {
		self.has_model_perm(content_type, PermissionAction::View)
			|| self.has_model_perm(content_type, PermissionAction::Change)
	}
}

impl Default for User {
	fn default() -> Self {
		Self::anonymous()
	}
}
