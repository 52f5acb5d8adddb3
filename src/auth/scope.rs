//! Ordered scope lists joined with a provider-specific delimiter.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain control characters.
	#[error("Scope contains a control character: {scope:?}.")]
	ContainsControl {
		/// The offending scope string.
		scope: String,
	},
}

/// Ordered list of provider scopes.
///
/// Unlike a set, insertion order is preserved and duplicates are kept, so the joined
/// `scope` parameter reproduces exactly what the service was configured with.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Builds a validated scope list from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Vec::new();

		for scope in scopes {
			let owned: String = scope.into();

			if owned.is_empty() {
				return Err(ScopeValidationError::Empty);
			}
			if owned.chars().any(char::is_control) {
				return Err(ScopeValidationError::ContainsControl { scope: owned });
			}

			list.push(owned);
		}

		Ok(Self(list))
	}

	/// Number of configured scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are configured.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scopes in configured order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	/// Joins the scopes with `delimiter`, preserving configured order.
	///
	/// Returns `None` for an empty list so callers can omit the parameter entirely.
	pub fn join(&self, delimiter: &str) -> Option<String> {
		if self.0.is_empty() {
			return None;
		}

		Some(self.0.join(delimiter))
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.0.iter() }
	}
}
impl TryFrom<Vec<String>> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
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
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeList::new(values).map_err(DeError::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn join_preserves_order_and_delimiter() {
		let scopes = ScopeList::new(["write", "read", "admin"])
			.expect("Scope list fixture should be valid.");

		assert_eq!(scopes.join(","), Some("write,read,admin".into()));
		assert_eq!(scopes.join(" "), Some("write read admin".into()));
		assert_eq!(scopes.join("%20"), Some("write%20read%20admin".into()));
		assert_eq!(ScopeList::default().join(","), None);
	}

	#[test]
	fn duplicates_are_kept() {
		let scopes = ScopeList::new(["email", "email"]).expect("Duplicates should be accepted.");

		assert_eq!(scopes.len(), 2);
		assert_eq!(scopes.join(" "), Some("email email".into()));
	}

	#[test]
	fn invalid_scopes_error() {
		assert_eq!(ScopeList::new([""]), Err(ScopeValidationError::Empty));
		assert!(matches!(
			ScopeList::new(["line\nbreak"]),
			Err(ScopeValidationError::ContainsControl { .. })
		));
		assert!(ScopeList::new(["https://www.googleapis.com/auth/userinfo.email"]).is_ok());
	}

	#[test]
	fn serde_round_trip_validates() {
		let scopes: ScopeList = serde_json::from_str("[\"user\",\"repo\"]")
			.expect("Scope list should deserialize from a JSON array.");

		assert_eq!(scopes.iter().collect::<Vec<_>>(), vec!["user", "repo"]);
		assert!(serde_json::from_str::<ScopeList>("[\"\"]").is_err());
		assert!(scopes.contains("repo"));
		assert_eq!((&scopes).into_iter().count(), 2);
	}
}
