//! Relation paths
//!
//! A relation path is a sequence of relation field names walked from a base
//! model, written as a dotted string (`customer.address`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Dotted relation path
///
/// # Examples
///
/// ```
/// use admin_export_core::RelationPath;
///
/// let path = RelationPath::parse("customer.address.");
/// assert_eq!(path.to_string(), "customer.address");
/// assert_eq!(path.qualify("city"), "customer.address.city");
/// assert_eq!(RelationPath::root().qualify("name"), "name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RelationPath {
	hops: Vec<String>,
}

impl RelationPath {
	/// The empty path at the base model
	pub fn root() -> Self {
		Self::default()
	}

	/// Parse a dotted path, ignoring empty segments
	pub fn parse(raw: &str) -> Self {
		Self {
			hops: raw
				.split('.')
				.map(str::trim)
				.filter(|hop| !hop.is_empty())
				.map(str::to_string)
				.collect(),
		}
	}

	/// Split a qualified field name into its path and final field
	///
	/// `customer.address.city` becomes (`customer.address`, `city`).
	pub fn split_field(qualified: &str) -> (Self, String) {
		let mut path = Self::parse(qualified);
		let field = path.hops.pop().unwrap_or_default();
		(path, field)
	}

	pub fn is_root(&self) -> bool {
		self.hops.is_empty()
	}

	pub fn hops(&self) -> &[String] {
		&self.hops
	}

	/// Path one hop further along `field`
	pub fn join(&self, field: &str) -> Self {
		let mut hops = self.hops.clone();
		hops.extend(Self::parse(field).hops);
		Self { hops }
	}

	/// Name of `field` as seen from the base model
	pub fn qualify(&self, field: &str) -> String {
		if self.is_root() {
			field.to_string()
		} else {
			format!("{}.{}", self, field)
		}
	}
}

impl fmt::Display for RelationPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.hops.join("."))
	}
}

impl Serialize for RelationPath {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for RelationPath {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Ok(Self::parse(&raw))
	}
}
