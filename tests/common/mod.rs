//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
#[cfg(feature = "reqwest")] use std::sync::Arc;
// crates.io
use oauth2_normalizer::{
	auth::{Credentials, ScopeList, ServiceName},
	provider::{AuthorizationMethod, ServiceConfig, ServiceConfigBuilder},
	url::Url,
};
#[cfg(feature = "reqwest")]
use oauth2_normalizer::{
	flows::{ReqwestService, Service},
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
	reqwest::Client as ReqwestClient,
	store::MemoryStore,
};

pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const CALLBACK: &str = "https://app.example.com/callback";

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("Fixture URL should parse.")
}

pub fn credentials() -> Credentials {
	Credentials::parse(CLIENT_ID, CLIENT_SECRET, CALLBACK)
		.expect("Fixture credentials should be valid.")
}

/// Builder for a service whose endpoints live under `base`.
pub fn config_builder(name: &str, base: &str) -> ServiceConfigBuilder {
	let base = base.trim_end_matches('/');

	ServiceConfig::builder(ServiceName::new(name).expect("Fixture service name should be valid."))
		.authorization_endpoint(url(&format!("{base}/authorize")))
		.token_endpoint(url(&format!("{base}/token")))
		.api_base_uri(url(&format!("{base}/api/")))
		.scopes(ScopeList::new(["read", "write"]).expect("Fixture scopes should be valid."))
		.authorization_method(AuthorizationMethod::HeaderBearer)
}

/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`.
#[cfg(feature = "reqwest")]
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Constructs a reqwest-backed service sharing one in-memory store for tokens and states.
#[cfg(feature = "reqwest")]
pub fn build_reqwest_test_service(config: ServiceConfig) -> (ReqwestService, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::default());
	let service = Service::with_http_client(
		config,
		credentials(),
		test_reqwest_http_client(),
		Arc::new(ReqwestTransportErrorMapper),
	)
	.with_token_storage(store.clone())
	.with_state_store(store.clone());

	(service, store)
}
