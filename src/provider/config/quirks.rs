// self
use crate::{_prelude::*, http::HttpMethod};

/// Grant types the engine can put on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Authorization Code grant.
	#[default]
	AuthorizationCode,
	/// Refresh Token grant.
	RefreshToken,
	/// Client Credentials grant, used by a few providers even for code exchanges.
	ClientCredentials,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
			GrantType::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Provider-specific deviations from a plain authorization code exchange.
///
/// Every deviation is opt-in data; the defaults describe a standard OAuth 2.0 provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeQuirks {
	/// Generate, store, and send a CSRF `state` with every authorization URL.
	pub require_state: bool,
	/// HTTP method for the code exchange; `GET` puts every parameter in the query.
	pub token_request_method: HttpMethod,
	/// `grant_type` sent with the code exchange.
	pub grant_type: GrantType,
	/// Re-send the joined scopes with the code exchange.
	pub resend_scope: bool,
	/// Also authenticate token requests with HTTP Basic `client_id:client_secret`.
	pub client_auth_basic: bool,
	/// `response_type` sent to the authorization endpoint.
	pub response_type: String,
	/// Default authorization parameters (e.g. `access_type`), overridable by callers.
	pub authorization_params: BTreeMap<String, String>,
}
impl Default for ExchangeQuirks {
	fn default() -> Self {
		Self {
			require_state: false,
			token_request_method: HttpMethod::Post,
			grant_type: GrantType::AuthorizationCode,
			resend_scope: false,
			client_auth_basic: false,
			response_type: "code".into(),
			authorization_params: BTreeMap::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_describe_standard_oauth2() {
		let quirks = ExchangeQuirks::default();

		assert!(!quirks.require_state);
		assert_eq!(quirks.token_request_method, HttpMethod::Post);
		assert_eq!(quirks.grant_type.as_str(), "authorization_code");
		assert_eq!(quirks.response_type, "code");
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let quirks: ExchangeQuirks =
			serde_json::from_str(r#"{"token_request_method":"GET","resend_scope":true}"#)
				.expect("Partial quirks should deserialize.");

		assert_eq!(quirks.token_request_method, HttpMethod::Get);
		assert!(quirks.resend_scope);
		assert_eq!(quirks.grant_type, GrantType::AuthorizationCode);
		assert!(serde_json::from_str::<ExchangeQuirks>(r#"{"pkce":true}"#).is_err());
	}
}
