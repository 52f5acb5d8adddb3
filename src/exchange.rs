//! Exchange engine building blocks: authorization URLs, token endpoint requests, and response
//! normalization.
//!
//! Everything here is pure. [`Service`](crate::flows::Service) wires these helpers to a transport,
//! the state store, and token storage.

pub mod normalize;

pub use normalize::*;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{AuthorizationState, Credentials, Secret},
	http::{HttpMethod, OutboundRequest},
	inject::{self, Credential},
	provider::{GrantType, ServiceConfig},
};

/// Authorization parameters the engine always owns.
pub const RESERVED_AUTHORIZATION_PARAMS: [&str; 4] =
	["client_id", "redirect_uri", "response_type", "scope"];

/// Stages an exchange moves through before it yields a token or an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeStage {
	/// Assembling the token endpoint request.
	BuildingRequest,
	/// Waiting on the transport.
	AwaitingResponse,
	/// Decoding and normalizing the response body.
	Normalizing,
}
impl ExchangeStage {
	/// Returns a stable label suitable for span or event fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::BuildingRequest => "building_request",
			Self::AwaitingResponse => "awaiting_response",
			Self::Normalizing => "normalizing",
		}
	}
}
impl Display for ExchangeStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Builds the URL users are redirected to.
///
/// Configured default parameters sit under `extras`; neither may replace the reserved
/// parameters. When `state` is given it replaces any `state` found in the extras.
pub fn authorization_url(
	config: &ServiceConfig,
	credentials: &Credentials,
	extras: &BTreeMap<String, String>,
	state: Option<&AuthorizationState>,
) -> Url {
	let mut url = config.endpoints.authorization.clone();
	let mut merged = config.quirks.authorization_params.clone();

	merged.extend(extras.iter().map(|(key, value)| (key.clone(), value.clone())));
	merged.retain(|key, _| !RESERVED_AUTHORIZATION_PARAMS.contains(&key.as_str()));

	if let Some(state) = state {
		merged.insert("state".into(), state.as_str().into());
	}

	{
		let mut query = url.query_pairs_mut();

		query.append_pair("client_id", credentials.consumer_id().as_str());
		query.append_pair("redirect_uri", credentials.callback_url().as_str());
		query.append_pair("response_type", &config.quirks.response_type);

		if let Some(scope) = config.joined_scopes() {
			query.append_pair("scope", &scope);
		}

		query.extend_pairs(&merged);
	}

	url
}

/// Builds the token endpoint request that trades `code` for a token.
pub fn build_exchange_request(
	config: &ServiceConfig,
	credentials: &Credentials,
	code: &str,
) -> OutboundRequest {
	let quirks = &config.quirks;
	let mut request =
		OutboundRequest::new(quirks.token_request_method, config.endpoints.token.clone());

	request.push_param("grant_type", quirks.grant_type.as_str());
	request.push_param("code", code);
	request.push_param("redirect_uri", credentials.callback_url().as_str());

	if let Some(scope) = config.joined_scopes().filter(|_| quirks.resend_scope) {
		request.push_param("scope", scope);
	}

	finish_token_request(config, credentials, request)
}

/// Builds the token endpoint request that trades `refresh_token` for a new token.
pub fn build_refresh_request(
	config: &ServiceConfig,
	credentials: &Credentials,
	refresh_token: &Secret,
) -> OutboundRequest {
	let mut request = OutboundRequest::new(HttpMethod::Post, config.endpoints.token.clone());

	request.push_param("grant_type", GrantType::RefreshToken.as_str());
	request.push_param("refresh_token", refresh_token.expose());

	finish_token_request(config, credentials, request)
}

fn finish_token_request(
	config: &ServiceConfig,
	credentials: &Credentials,
	mut request: OutboundRequest,
) -> OutboundRequest {
	for (name, value) in &config.extra_authorization_headers {
		request.set_header(name, value.as_str());
	}

	if config.quirks.client_auth_basic {
		let pair = format!(
			"{}:{}",
			credentials.consumer_id().as_str(),
			credentials.consumer_secret().expose()
		);

		request.set_header("Authorization", format!("Basic {}", STANDARD.encode(pair)));
	}

	inject::inject_credentials(
		config.authorization_method,
		&Credential::client(credentials),
		request,
	)
}
