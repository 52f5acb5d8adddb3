//! Normalized token model shared by every provider.

// self
use crate::{_prelude::*, auth::Secret};

/// Legacy integer encoding for an unknown end of life.
pub const EOL_UNKNOWN: i64 = -9001;
/// Legacy integer encoding for a token that never expires.
pub const EOL_NEVER_EXPIRES: i64 = -9002;

/// Absolute expiry of a token, or one of the two sentinels.
///
/// Serialized as an integer UNIX timestamp, with [`EOL_UNKNOWN`] and [`EOL_NEVER_EXPIRES`]
/// standing in for the sentinels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum EndOfLife {
	/// Provider did not say when the token expires.
	Unknown,
	/// Provider issues non-expiring tokens.
	NeverExpires,
	/// Token expires at this instant (whole seconds).
	At(OffsetDateTime),
}
impl EndOfLife {
	/// Computes `issued_at + lifetime`, truncated to whole seconds.
	///
	/// A zero lifetime means the token never expires. Negative or out-of-range lifetimes
	/// yield `None`.
	pub fn from_lifetime(issued_at: OffsetDateTime, lifetime_secs: i64) -> Option<Self> {
		match lifetime_secs {
			0 => Some(Self::NeverExpires),
			secs if secs < 0 => None,
			secs => issued_at
				.unix_timestamp()
				.checked_add(secs)
				.and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
				.map(Self::At),
		}
	}

	/// Returns the integer encoding (UNIX timestamp or sentinel).
	pub fn unix_timestamp(self) -> i64 {
		match self {
			Self::Unknown => EOL_UNKNOWN,
			Self::NeverExpires => EOL_NEVER_EXPIRES,
			Self::At(instant) => instant.unix_timestamp(),
		}
	}

	/// Returns the expiry instant, if one is known.
	pub fn instant(self) -> Option<OffsetDateTime> {
		match self {
			Self::At(instant) => Some(instant),
			_ => None,
		}
	}

	/// Returns `true` when the end of life is a timestamp strictly before `now`.
	pub fn is_expired_at(self, now: OffsetDateTime) -> bool {
		matches!(self, Self::At(instant) if now > instant)
	}
}
impl From<EndOfLife> for i64 {
	fn from(value: EndOfLife) -> Self {
		value.unix_timestamp()
	}
}
impl TryFrom<i64> for EndOfLife {
	type Error = time::error::ComponentRange;

	fn try_from(value: i64) -> Result<Self, Self::Error> {
		match value {
			EOL_UNKNOWN => Ok(Self::Unknown),
			EOL_NEVER_EXPIRES => Ok(Self::NeverExpires),
			ts => OffsetDateTime::from_unix_timestamp(ts).map(Self::At),
		}
	}
}

/// Errors produced by [`TokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenBuilderError {
	/// Issued when no access token value was provided, or it was empty.
	#[error("Access token is required.")]
	MissingAccessToken,
}

/// Access token plus the metadata a provider returned alongside it.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
	access_token: Secret,
	refresh_token: Option<Secret>,
	end_of_life: EndOfLife,
	extra_params: BTreeMap<String, JsonValue>,
}
impl Token {
	/// Returns a builder for assembling tokens.
	pub fn builder() -> TokenBuilder {
		TokenBuilder::default()
	}

	/// Access token secret.
	pub fn access_token(&self) -> &Secret {
		&self.access_token
	}

	/// Refresh token secret, if the provider issued one.
	pub fn refresh_token(&self) -> Option<&Secret> {
		self.refresh_token.as_ref()
	}

	/// Expiry of the access token.
	pub fn end_of_life(&self) -> EndOfLife {
		self.end_of_life
	}

	/// Provider fields that have no dedicated slot (e.g. `token_type`, `scope`).
	pub fn extra_params(&self) -> &BTreeMap<String, JsonValue> {
		&self.extra_params
	}

	/// Returns `true` if the token has a known end of life before `now`.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.end_of_life.is_expired_at(now)
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Replaces the refresh token.
	pub fn set_refresh_token(&mut self, refresh_token: Option<Secret>) {
		self.refresh_token = refresh_token.filter(|secret| !secret.is_empty());
	}

	/// Replaces the end of life.
	pub fn set_end_of_life(&mut self, end_of_life: EndOfLife) {
		self.end_of_life = end_of_life;
	}

	/// Sets the end of life from a lifetime measured from `issued_at`.
	///
	/// `None` marks the end of life as unknown; negative or out-of-range lifetimes are ignored
	/// and also yield [`EndOfLife::Unknown`].
	pub fn set_lifetime(&mut self, issued_at: OffsetDateTime, lifetime_secs: Option<i64>) {
		self.end_of_life = lifetime_secs
			.and_then(|secs| EndOfLife::from_lifetime(issued_at, secs))
			.unwrap_or(EndOfLife::Unknown);
	}

	/// Replaces the extra parameters.
	pub fn set_extra_params(&mut self, extra_params: BTreeMap<String, JsonValue>) {
		self.extra_params = extra_params;
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("end_of_life", &self.end_of_life)
			.field("extra_params", &self.extra_params)
			.finish()
	}
}

/// Builder for [`Token`].
#[derive(Clone, Debug)]
pub struct TokenBuilder {
	access_token: Option<Secret>,
	refresh_token: Option<Secret>,
	end_of_life: EndOfLife,
	extra_params: BTreeMap<String, JsonValue>,
}
impl TokenBuilder {
	/// Sets the access token secret.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(Secret::new(token));

		self
	}

	/// Sets the refresh token secret.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(Secret::new(token));

		self
	}

	/// Sets the end of life directly.
	pub fn end_of_life(mut self, end_of_life: EndOfLife) -> Self {
		self.end_of_life = end_of_life;

		self
	}

	/// Adds one extra parameter.
	pub fn extra_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.extra_params.insert(key.into(), value.into());

		self
	}

	/// Replaces all extra parameters.
	pub fn extra_params(mut self, extra_params: BTreeMap<String, JsonValue>) -> Self {
		self.extra_params = extra_params;

		self
	}

	/// Validates and builds the token.
	pub fn build(self) -> Result<Token, TokenBuilderError> {
		let access_token = self
			.access_token
			.filter(|secret| !secret.is_empty())
			.ok_or(TokenBuilderError::MissingAccessToken)?;
		let refresh_token = self.refresh_token.filter(|secret| !secret.is_empty());

		Ok(Token {
			access_token,
			refresh_token,
			end_of_life: self.end_of_life,
			extra_params: self.extra_params,
		})
	}
}
impl Default for TokenBuilder {
	fn default() -> Self {
		Self {
			access_token: None,
			refresh_token: None,
			end_of_life: EndOfLife::Unknown,
			extra_params: BTreeMap::new(),
		}
	}
}
