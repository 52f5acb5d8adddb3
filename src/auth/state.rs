//! One-time anti-forgery states round-tripped through the authorization redirect.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use subtle::ConstantTimeEq;
// self
use crate::_prelude::*;

const STATE_BYTES: usize = 32;

/// Opaque CSRF state bound to one service until it is validated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationState(String);
impl AuthorizationState {
	/// Generates a fresh state from 32 cryptographically random bytes (base64url, no padding).
	pub fn generate() -> Self {
		let mut bytes = [0_u8; STATE_BYTES];

		rand::rng().fill(&mut bytes);

		Self(URL_SAFE_NO_PAD.encode(bytes))
	}

	/// Returns the state string sent to the provider.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Constant-time comparison against the state returned by the provider.
	pub fn matches(&self, candidate: &str) -> bool {
		self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
	}
}
impl From<String> for AuthorizationState {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for AuthorizationState {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl AsRef<str> for AuthorizationState {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for AuthorizationState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AuthorizationState(<redacted>)")
	}
}
