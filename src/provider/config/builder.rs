// crates.io
use oauth2::http::{HeaderName, HeaderValue};
// self
use crate::{
	_prelude::*,
	auth::{ScopeList, ServiceName},
	provider::{
		AuthorizationMethod, ExchangeQuirks, ResponseNormalization, ServiceConfig,
		ServiceEndpoints,
	},
};

/// Errors raised while constructing or validating service configurations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ServiceConfigError {
	/// Authorization endpoint is mandatory.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Endpoints must be absolute HTTP(S) URLs.
	#[error("The {endpoint} endpoint must be an absolute http(s) URL: {url}.")]
	UnsupportedEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Scope delimiters must be non-empty and printable.
	#[error("Scope delimiter {delimiter:?} must be non-empty and printable.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: String,
	},
	/// A scope would be split apart by the delimiter.
	#[error("Scope {scope:?} contains the scope delimiter.")]
	ScopeContainsDelimiter {
		/// The offending scope.
		scope: String,
	},
	/// Header name or value cannot be sent over HTTP.
	#[error("Header `{name}` is not a valid HTTP header.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// The `response_type` quirk must not be empty.
	#[error("Response type cannot be empty.")]
	EmptyResponseType,
	/// At least one error field alias is required for error classification.
	#[error("At least one error field alias is required.")]
	NoErrorFields,
	/// Strategy name is not one of the supported injection strategies.
	#[error("Unknown authorization method `{value}`.")]
	UnknownAuthorizationMethod {
		/// Unrecognized strategy name or code.
		value: String,
	},
}

/// Builder for [`ServiceConfig`] values.
///
/// The builder doubles as the serde representation of a configuration, so JSON documents use
/// the flat field names below.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfigBuilder {
	/// Logical service name.
	pub name: ServiceName,
	/// Authorization endpoint (required).
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint (required).
	pub token_endpoint: Option<Url>,
	/// Optional API base URI.
	#[serde(default)]
	pub api_base_uri: Option<Url>,
	/// Scopes in request order.
	#[serde(default)]
	pub scopes: ScopeList,
	/// Scope delimiter (defaults to a single space).
	#[serde(default = "default_scope_delimiter")]
	pub scope_delimiter: String,
	/// Credential injection strategy for API calls.
	#[serde(default)]
	pub authorization_method: AuthorizationMethod,
	/// Extra token endpoint headers.
	#[serde(default)]
	pub extra_authorization_headers: BTreeMap<String, String>,
	/// Extra API headers.
	#[serde(default)]
	pub extra_api_headers: BTreeMap<String, String>,
	/// Exchange quirks.
	#[serde(default)]
	pub quirks: ExchangeQuirks,
	/// Response-normalization aliases.
	#[serde(default)]
	pub normalization: ResponseNormalization,
}
impl ServiceConfigBuilder {
	/// Creates a new builder seeded with the provided service name.
	pub fn new(name: ServiceName) -> Self {
		Self {
			name,
			authorization_endpoint: None,
			token_endpoint: None,
			api_base_uri: None,
			scopes: ScopeList::default(),
			scope_delimiter: default_scope_delimiter(),
			authorization_method: AuthorizationMethod::default(),
			extra_authorization_headers: BTreeMap::new(),
			extra_api_headers: BTreeMap::new(),
			quirks: ExchangeQuirks::default(),
			normalization: ResponseNormalization::default(),
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the base URI relative API paths resolve against.
	pub fn api_base_uri(mut self, url: Url) -> Self {
		self.api_base_uri = Some(url);

		self
	}

	/// Replaces the configured scopes.
	pub fn scopes(mut self, scopes: ScopeList) -> Self {
		self.scopes = scopes;

		self
	}

	/// Overrides the scope delimiter.
	pub fn scope_delimiter(mut self, delimiter: impl Into<String>) -> Self {
		self.scope_delimiter = delimiter.into();

		self
	}

	/// Selects the credential injection strategy.
	pub fn authorization_method(mut self, method: AuthorizationMethod) -> Self {
		self.authorization_method = method;

		self
	}

	/// Adds a header sent with token endpoint requests.
	pub fn extra_authorization_header(
		mut self,
		name: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		self.extra_authorization_headers.insert(name.into(), value.into());

		self
	}

	/// Adds a header sent with API requests.
	pub fn extra_api_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_api_headers.insert(name.into(), value.into());

		self
	}

	/// Overrides the exchange quirks.
	pub fn quirks(mut self, quirks: ExchangeQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Overrides the response-normalization aliases.
	pub fn normalization(mut self, normalization: ResponseNormalization) -> Self {
		self.normalization = normalization;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ServiceConfig, ServiceConfigError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(ServiceConfigError::MissingAuthorizationEndpoint)?;
		let token = self.token_endpoint.ok_or(ServiceConfigError::MissingTokenEndpoint)?;
		let endpoints = ServiceEndpoints { authorization, token, api_base: self.api_base_uri };
		let config = ServiceConfig {
			name: self.name,
			endpoints,
			scopes: self.scopes,
			scope_delimiter: self.scope_delimiter,
			authorization_method: self.authorization_method,
			extra_authorization_headers: self.extra_authorization_headers,
			extra_api_headers: self.extra_api_headers,
			quirks: self.quirks,
			normalization: self.normalization,
		};

		config.validate()?;

		Ok(config)
	}
}
impl From<ServiceConfig> for ServiceConfigBuilder {
	fn from(config: ServiceConfig) -> Self {
		Self {
			name: config.name,
			authorization_endpoint: Some(config.endpoints.authorization),
			token_endpoint: Some(config.endpoints.token),
			api_base_uri: config.endpoints.api_base,
			scopes: config.scopes,
			scope_delimiter: config.scope_delimiter,
			authorization_method: config.authorization_method,
			extra_authorization_headers: config.extra_authorization_headers,
			extra_api_headers: config.extra_api_headers,
			quirks: config.quirks,
			normalization: config.normalization,
		}
	}
}
impl TryFrom<ServiceConfigBuilder> for ServiceConfig {
	type Error = ServiceConfigError;

	fn try_from(builder: ServiceConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

impl ServiceConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ServiceConfigError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;

		if let Some(api_base) = self.endpoints.api_base.as_ref() {
			validate_endpoint("api", api_base)?;
		}

		validate_scope_delimiter(&self.scope_delimiter)?;

		if let Some(scope) = self.scopes.iter().find(|scope| scope.contains(&self.scope_delimiter))
		{
			return Err(ServiceConfigError::ScopeContainsDelimiter { scope: scope.to_owned() });
		}

		for (name, value) in self.extra_authorization_headers.iter().chain(&self.extra_api_headers)
		{
			validate_header(name, value)?;
		}

		if self.quirks.response_type.is_empty() {
			return Err(ServiceConfigError::EmptyResponseType);
		}
		if self.normalization.error_fields.is_empty() {
			return Err(ServiceConfigError::NoErrorFields);
		}

		Ok(())
	}
}

fn default_scope_delimiter() -> String {
	" ".into()
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ServiceConfigError> {
	if matches!(url.scheme(), "http" | "https") && url.has_host() {
		Ok(())
	} else {
		Err(ServiceConfigError::UnsupportedEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn validate_scope_delimiter(delimiter: &str) -> Result<(), ServiceConfigError> {
	if delimiter.is_empty() || delimiter.chars().any(char::is_control) {
		Err(ServiceConfigError::InvalidScopeDelimiter { delimiter: delimiter.to_owned() })
	} else {
		Ok(())
	}
}

fn validate_header(name: &str, value: &str) -> Result<(), ServiceConfigError> {
	if HeaderName::from_bytes(name.as_bytes()).is_ok() && HeaderValue::from_str(value).is_ok() {
		Ok(())
	} else {
		Err(ServiceConfigError::InvalidHeader { name: name.to_owned() })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> ServiceConfigBuilder {
		ServiceConfig::builder(ServiceName::new("github").expect("Service fixture should be valid."))
			.authorization_endpoint(
				Url::parse("https://github.com/login/oauth/authorize")
					.expect("Authorization endpoint fixture should parse."),
			)
			.token_endpoint(
				Url::parse("https://github.com/login/oauth/access_token")
					.expect("Token endpoint fixture should parse."),
			)
	}

	#[test]
	fn missing_endpoints_are_rejected() {
		let name = ServiceName::new("svc").expect("Service fixture should be valid.");

		assert_eq!(
			ServiceConfig::builder(name.clone()).build(),
			Err(ServiceConfigError::MissingAuthorizationEndpoint)
		);
		assert_eq!(
			ServiceConfig::builder(name)
				.authorization_endpoint(
					Url::parse("https://example.com/auth").expect("Fixture URL should parse."),
				)
				.build(),
			Err(ServiceConfigError::MissingTokenEndpoint)
		);
	}

	#[test]
	fn endpoints_must_be_http() {
		let err = builder()
			.token_endpoint(Url::parse("ftp://example.com/token").expect("Fixture should parse."))
			.build()
			.expect_err("Non-HTTP endpoints must be rejected.");

		assert!(matches!(err, ServiceConfigError::UnsupportedEndpoint { endpoint: "token", .. }));
	}

	#[test]
	fn delimiter_and_scopes_are_validated() {
		assert!(matches!(
			builder().scope_delimiter("").build(),
			Err(ServiceConfigError::InvalidScopeDelimiter { .. })
		));
		assert!(matches!(
			builder().scope_delimiter("\t").build(),
			Err(ServiceConfigError::InvalidScopeDelimiter { .. })
		));

		let scopes = ScopeList::new(["user:email", "read,write"]).expect("Scopes should be valid.");

		assert_eq!(
			builder().scope_delimiter(",").scopes(scopes).build(),
			Err(ServiceConfigError::ScopeContainsDelimiter { scope: "read,write".into() })
		);
	}

	#[test]
	fn headers_and_quirks_are_validated() {
		assert!(matches!(
			builder().extra_api_header("Bad Header", "x").build(),
			Err(ServiceConfigError::InvalidHeader { .. })
		));
		assert!(matches!(
			builder().extra_authorization_header("Accept", "line\nbreak").build(),
			Err(ServiceConfigError::InvalidHeader { .. })
		));
		assert_eq!(
			builder()
				.quirks(ExchangeQuirks { response_type: String::new(), ..Default::default() })
				.build(),
			Err(ServiceConfigError::EmptyResponseType)
		);
		assert_eq!(
			builder()
				.normalization(ResponseNormalization {
					error_fields: Vec::new(),
					..Default::default()
				})
				.build(),
			Err(ServiceConfigError::NoErrorFields)
		);
	}

	#[test]
	fn builds_a_valid_configuration() {
		let config = builder()
			.scopes(ScopeList::new(["user", "repo"]).expect("Scopes should be valid."))
			.scope_delimiter(",")
			.authorization_method(AuthorizationMethod::HeaderToken)
			.extra_authorization_header("Accept", "application/json")
			.extra_api_header("Accept", "application/vnd.github.v3+json")
			.normalization(ResponseNormalization::default().never_expires_without_expiry())
			.build()
			.expect("GitHub-like configuration should build.");

		assert_eq!(config.joined_scopes(), Some("user,repo".into()));
		assert_eq!(config.authorization_method, AuthorizationMethod::HeaderToken);
		assert_eq!(
			config.extra_authorization_headers.get("Accept").map(String::as_str),
			Some("application/json")
		);
	}
}
