//! Ordered scope lists in VK's comma-delimited form.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Delimiter VK expects between permissions in the `scope` parameter.
pub const SCOPE_DELIMITER: char = ',';

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Flat, ordered list of requested VK permissions (`friends`, `photos`, `offline`, ...).
///
/// A single value and a sequence normalize to the same list: `"friends,photos"`,
/// `["friends", "photos"]` and `["friends,photos"]` are equal. Entries are trimmed and keep
/// the caller's order, so the rendered parameter is predictable.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Creates a flat scope list from any iterator of scope strings.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut flat = Vec::new();

		for scope in scopes {
			flatten_into(scope.as_ref(), &mut flat)?;
		}

		Ok(Self(flat))
	}

	/// Creates a scope list from one value, splitting it on commas.
	pub fn single(scope: impl AsRef<str>) -> Result<Self, ScopeValidationError> {
		Self::new([scope])
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the list has no entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scope names in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.as_str())
	}

	/// Renders the list the way VK reads the `scope` parameter.
	pub fn to_param(&self) -> String {
		self.join(SCOPE_DELIMITER)
	}

	/// Joins the entries with an arbitrary delimiter.
	pub fn join(&self, delimiter: char) -> String {
		let mut buf = String::new();

		for (idx, value) in self.0.iter().enumerate() {
			if idx > 0 {
				buf.push(delimiter);
			}

			buf.push_str(value);
		}

		buf
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.to_param())
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = Iter<'a, String>;
	type Item = &'a String;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
impl FromStr for ScopeList {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::single(s)
	}
}
impl TryFrom<&str> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::single(value)
	}
}
impl TryFrom<String> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::single(value)
	}
}
impl TryFrom<Vec<String>> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl<const N: usize> TryFrom<[&str; N]> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: [&str; N]) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in self.0.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			One(String),
			Many(Vec<String>),
		}

		match Raw::deserialize(deserializer)? {
			Raw::One(value) => ScopeList::single(value),
			Raw::Many(values) => ScopeList::new(values),
		}
		.map_err(DeError::custom)
	}
}

fn flatten_into(raw: &str, out: &mut Vec<String>) -> Result<(), ScopeValidationError> {
	for part in raw.split(SCOPE_DELIMITER) {
		let part = part.trim();

		if part.is_empty() {
			return Err(ScopeValidationError::Empty);
		}
		if part.chars().any(char::is_whitespace) {
			return Err(ScopeValidationError::ContainsWhitespace { scope: part.to_owned() });
		}

		out.push(part.to_owned());
	}

	Ok(())
}
