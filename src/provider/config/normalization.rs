// self
use crate::{_prelude::*, auth::EndOfLife};

/// End of life assigned when a response carries no expiry field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingExpiry {
	/// The expiry is unknown.
	#[default]
	Unknown,
	/// The provider documents its tokens as non-expiring.
	NeverExpires,
}
impl MissingExpiry {
	/// Returns the end of life this policy stands for.
	pub const fn end_of_life(self) -> EndOfLife {
		match self {
			Self::Unknown => EndOfLife::Unknown,
			Self::NeverExpires => EndOfLife::NeverExpires,
		}
	}
}

/// Field-name aliases used while normalizing token responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponseNormalization {
	/// Fields signalling a provider error, checked in order; the first non-null one wins.
	pub error_fields: Vec<String>,
	/// Fields carrying the lifetime in seconds, checked in order.
	pub expiry_fields: Vec<String>,
	/// End of life used when none of the expiry fields is present.
	pub missing_expiry: MissingExpiry,
}
impl ResponseNormalization {
	/// Replaces the error field aliases.
	pub fn error_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.error_fields = fields.into_iter().map(Into::into).collect();

		self
	}

	/// Replaces the expiry field aliases.
	pub fn expiry_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.expiry_fields = fields.into_iter().map(Into::into).collect();

		self
	}

	/// Marks tokens without an expiry field as never expiring.
	pub fn never_expires_without_expiry(mut self) -> Self {
		self.missing_expiry = MissingExpiry::NeverExpires;

		self
	}
}
impl Default for ResponseNormalization {
	fn default() -> Self {
		Self {
			error_fields: vec!["error".into()],
			expiry_fields: vec!["expires_in".into()],
			missing_expiry: MissingExpiry::Unknown,
		}
	}
}
