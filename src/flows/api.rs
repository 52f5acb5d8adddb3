//! Authorized calls against the provider API.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	exchange,
	flows::Service,
	http::{self, HttpMethod, OutboundRequest, RequestBody, TransportClient, TransportErrorMapper},
	inject::{self, Credential},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C, M> Service<C, M>
where
	C: ?Sized + TransportClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds an API request carrying the stored access token.
	///
	/// Absolute URLs are used as-is; relative paths resolve against the API base URI. Headers
	/// are layered so caller headers win over the injected authorization, which wins over the
	/// configured API headers.
	pub fn authorized_request(
		&self,
		path: &str,
		method: HttpMethod,
		body: RequestBody,
		headers: &[(&str, &str)],
	) -> Result<OutboundRequest> {
		let url = self.resolve_api_url(path)?;
		let token = self.stored_token()?;
		let now = OffsetDateTime::now_utc();

		if let Some(expired_at) = token.end_of_life().instant().filter(|at| now > *at) {
			return Err(Error::TokenExpired { service: self.config().name.clone(), expired_at });
		}

		let mut request = OutboundRequest::new(method, url);

		request.body = body;

		for (name, value) in &self.config().extra_api_headers {
			request.set_header(name, value.as_str());
		}

		let mut request = inject::inject_credentials(
			self.config().authorization_method,
			&Credential::AccessToken(token.access_token().expose()),
			request,
		);

		for (name, value) in headers {
			request.set_header(name, *value);
		}

		Ok(request)
	}

	/// Sends an authorized API request and returns the body of a 2xx response.
	///
	/// Bodies that are not valid UTF-8 fail with [`ResponseParseError::Undecodable`].
	///
	/// [`ResponseParseError::Undecodable`]: crate::error::ResponseParseError::Undecodable
	pub async fn request(
		&self,
		path: &str,
		method: HttpMethod,
		body: RequestBody,
		headers: &[(&str, &str)],
	) -> Result<String> {
		const KIND: FlowKind = FlowKind::ApiRequest;

		let span = FlowSpan::new(KIND, "request", self.name());

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self.authorized_request(path, method, body, headers)?;
				let body = http::execute(
					self.http_client.as_ref(),
					self.transport_mapper.as_ref(),
					request,
				)
				.await?;

				Ok(exchange::decode_utf8(body)?)
			})
			.await;

		obs::record_result(KIND, result)
	}

	fn resolve_api_url(&self, path: &str) -> Result<Url> {
		match Url::parse(path) {
			Ok(url) => Ok(url),
			Err(url::ParseError::RelativeUrlWithoutBase) => {
				let base = self.config().endpoints.api_base.as_ref().ok_or_else(|| {
					ConfigError::MissingApiBaseUri {
						service: self.config().name.clone(),
						path: path.to_owned(),
					}
				})?;

				base.join(path).map_err(|source| {
					ConfigError::InvalidApiPath { path: path.to_owned(), source }.into()
				})
			},
			Err(source) => Err(ConfigError::InvalidApiPath { path: path.to_owned(), source }.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;
	use crate::{
		auth::{EndOfLife, Token},
		error::ErrorKind,
		flows::test_support::{StubService, StubTransport, config_builder, service},
		provider::AuthorizationMethod,
	};

	fn stored(service: &StubService, end_of_life: EndOfLife) {
		let token = Token::builder()
			.access_token("tok")
			.end_of_life(end_of_life)
			.build()
			.expect("Token fixture should build.");

		service.storage.store("demo", token).expect("Token should be stored.");
	}

	#[test]
	fn headers_follow_precedence() {
		let config = config_builder()
			.extra_api_header("Authorization", "configured")
			.extra_api_header("Accept", "application/json")
			.build()
			.expect("Config should build.");
		let service = service(config, StubTransport::default());

		stored(&service, EndOfLife::NeverExpires);

		let injected = service
			.authorized_request("user", HttpMethod::Get, RequestBody::Empty, &[])
			.expect("Request should build.");

		assert_eq!(injected.url.as_str(), "https://api.example.com/v1/user");
		assert_eq!(injected.header("authorization"), Some("Bearer tok"));
		assert_eq!(injected.header("accept"), Some("application/json"));

		let overridden = service
			.authorized_request(
				"https://other.example.com/x",
				HttpMethod::Get,
				RequestBody::Empty,
				&[("Authorization", "caller")],
			)
			.expect("Request should build.");

		assert_eq!(overridden.url.as_str(), "https://other.example.com/x");
		assert_eq!(overridden.header("authorization"), Some("caller"));
	}

	#[test]
	fn query_strategies_append_the_token() {
		let config = config_builder()
			.authorization_method(AuthorizationMethod::QueryStringV2)
			.build()
			.expect("Config should build.");
		let service = service(config, StubTransport::default());

		stored(&service, EndOfLife::Unknown);

		let request = service
			.authorized_request("people/~", HttpMethod::Post, RequestBody::Raw("{}".into()), &[])
			.expect("Request should build.");

		assert_eq!(request.url.query(), Some("oauth2_access_token=tok"));
		assert_eq!(request.body, RequestBody::Raw("{}".into()));
	}

	#[test]
	fn expired_and_missing_tokens_are_reported() {
		let service =
			service(config_builder().build().expect("Config should build."), StubTransport::default());
		let missing = service
			.authorized_request("user", HttpMethod::Get, RequestBody::Empty, &[])
			.expect_err("Missing token should fail.");

		assert_eq!(missing.kind(), ErrorKind::TokenNotFound);

		stored(&service, EndOfLife::At(datetime!(2000-01-01 00:00:00 UTC)));

		let expired = service
			.authorized_request("user", HttpMethod::Get, RequestBody::Empty, &[])
			.expect_err("Expired token should fail.");

		assert!(matches!(
			expired,
			Error::TokenExpired { expired_at, .. } if expired_at == datetime!(2000-01-01 00:00:00 UTC)
		));
	}

	#[test]
	fn relative_paths_need_a_base_uri() {
		let mut config = config_builder().build().expect("Config should build.");

		config.endpoints.api_base = None;

		let service = service(config, StubTransport::default());

		stored(&service, EndOfLife::NeverExpires);

		let err = service
			.authorized_request("user", HttpMethod::Get, RequestBody::Empty, &[])
			.expect_err("Relative path without a base should fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingApiBaseUri { .. })));
	}

	#[tokio::test]
	async fn request_returns_the_response_body() {
		let transport = StubTransport::replying(200, r#"{"login":"octocat"}"#);
		let service =
			service(config_builder().build().expect("Config should build."), transport.clone());

		stored(&service, EndOfLife::NeverExpires);

		let body = service
			.request("user", HttpMethod::Get, RequestBody::Empty, &[])
			.await
			.expect("Request should succeed.");

		assert_eq!(body, r#"{"login":"octocat"}"#);
		assert_eq!(
			transport.requests.lock()[0].headers().get("authorization").map(|v| v.as_bytes()),
			Some(b"Bearer tok".as_slice())
		);
	}
}
