//! Service configuration data structures shared by every operation.

/// Builder API for assembling service configurations.
pub mod builder;
/// Credential injection strategies.
pub mod method;
/// Response-normalization aliases.
pub mod normalization;
/// Exchange quirks that deviate from plain OAuth 2.0.
pub mod quirks;

pub use builder::*;
pub use method::*;
pub use normalization::*;
pub use quirks::*;

// self
use crate::{
	_prelude::*,
	auth::{ScopeList, ServiceName},
	error::ConfigError,
};

/// Endpoint set declared by a service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
	/// Authorization endpoint users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for code exchanges and refreshes.
	pub token: Url,
	/// Base URI that relative API paths are resolved against.
	pub api_base: Option<Url>,
}

/// Immutable per-provider configuration consumed by the exchange engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ServiceConfigBuilder", into = "ServiceConfigBuilder")]
pub struct ServiceConfig {
	/// Logical service name keying token slots and pending states.
	pub name: ServiceName,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ServiceEndpoints,
	/// Scopes requested during authorization, in configured order.
	pub scopes: ScopeList,
	/// String placed between scopes in the `scope` parameter.
	pub scope_delimiter: String,
	/// Where access tokens go on API calls.
	pub authorization_method: AuthorizationMethod,
	/// Extra headers sent with token endpoint requests.
	pub extra_authorization_headers: BTreeMap<String, String>,
	/// Extra headers sent with API requests.
	pub extra_api_headers: BTreeMap<String, String>,
	/// Exchange quirks.
	pub quirks: ExchangeQuirks,
	/// Response-normalization aliases.
	pub normalization: ResponseNormalization,
}
impl ServiceConfig {
	/// Creates a new builder for the provided service name.
	pub fn builder(name: ServiceName) -> ServiceConfigBuilder {
		ServiceConfigBuilder::new(name)
	}

	/// Loads and validates a configuration from JSON.
	///
	/// Parse failures report the JSON path of the offending field.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);

		serde_path_to_error::deserialize(&mut de).map_err(|source| ConfigError::Load { source })
	}

	/// Joins the configured scopes, or `None` when no scopes are configured.
	pub fn joined_scopes(&self) -> Option<String> {
		self.scopes.join(&self.scope_delimiter)
	}
}
