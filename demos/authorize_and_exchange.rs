//! Walks a full authorization code round trip against a mock provider: build the authorization
//! URL, exchange the returned code, call the API, and refresh once the token lapses.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth2_normalizer::{
	auth::{Credentials, ScopeList, ServiceName},
	flows::ReqwestService,
	http::{HttpMethod, ReqwestHttpClient, ReqwestTransportErrorMapper, RequestBody},
	provider::{AuthorizationMethod, ExchangeQuirks, ServiceConfig},
	reqwest::Client,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let mut token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"refresh_token\":\"demo-refresh\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/me").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body("{\"id\":\"42\"}");
		})
		.await;
	let config = ServiceConfig::builder(ServiceName::new("demo-provider")?)
		.authorization_endpoint(Url::parse(&server.url("/authorize"))?)
		.token_endpoint(Url::parse(&server.url("/token"))?)
		.api_base_uri(Url::parse(&server.url("/api/"))?)
		.scopes(ScopeList::new(["profile", "email"])?)
		.authorization_method(AuthorizationMethod::HeaderBearer)
		.quirks(ExchangeQuirks { require_state: true, ..Default::default() })
		.build()?;
	let credentials =
		Credentials::parse("demo-client", "demo-secret", "http://localhost:8080/callback")?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let service = ReqwestService::with_http_client(
		config,
		credentials,
		http_client,
		Arc::new(ReqwestTransportErrorMapper),
	);
	let authorize_url = service.authorization_url(&[("prompt", "consent")])?;

	println!("Send the user to: {authorize_url}");

	let state = authorize_url
		.query_pairs()
		.find(|(key, _)| key == "state")
		.map(|(_, value)| value.into_owned())
		.unwrap_or_default();
	let token = service.exchange("code-from-callback", Some(&state)).await?;

	println!("Access token {} expires {:?}.", token.access_token().expose(), token.end_of_life());

	token_mock.assert_async().await;
	token_mock.delete_async().await;
	token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access-2\",\"expires_in\":900}");
		})
		.await;

	let profile = service.request("me", HttpMethod::Get, RequestBody::Empty, &[]).await?;

	println!("Profile: {profile}");

	let refreshed = service.refresh_access_token(&token).await?;

	println!("Refreshed token keeps refresh token: {}.", refreshed.refresh_token().is_some());

	token_mock.assert_async().await;
	api_mock.assert_async().await;

	Ok(())
}
