mod common;

// crates.io
use time::macros;
// self
use common::*;
use oauth2_normalizer::{
	auth::{EndOfLife, ScopeList},
	error::{ConfigError, Error},
	exchange,
	http::{HttpMethod, RequestBody},
	provider::{AuthorizationMethod, ServiceConfig, ServiceConfigError},
};

const GITHUB: &str = r#"{
	"name": "github",
	"authorization_endpoint": "https://github.com/login/oauth/authorize",
	"token_endpoint": "https://github.com/login/oauth/access_token",
	"api_base_uri": "https://api.github.com/",
	"scopes": ["repo", "user:email"],
	"scope_delimiter": ",",
	"authorization_method": "header_token",
	"extra_authorization_headers": { "Accept": "application/json" },
	"extra_api_headers": { "Accept": "application/vnd.github+json" },
	"quirks": { "require_state": true },
	"normalization": { "missing_expiry": "never_expires" }
}"#;
const PAYPAL: &str = r#"{
	"name": "paypal",
	"authorization_endpoint": "https://www.paypal.com/signin/authorize",
	"token_endpoint": "https://api.paypal.com/v1/identity/openidconnect/tokenservice",
	"scopes": ["openid", "profile"],
	"authorization_method": "header_bearer",
	"quirks": { "client_auth_basic": true },
	"normalization": { "error_fields": ["error", "message", "name"] }
}"#;
const BITRIX: &str = r#"{
	"name": "bitrix24",
	"authorization_endpoint": "https://portal.bitrix24.com/oauth/authorize/",
	"token_endpoint": "https://portal.bitrix24.com/oauth/token/",
	"scopes": ["user"],
	"authorization_method": "query_string_v4",
	"quirks": { "token_request_method": "GET", "resend_scope": true },
	"normalization": { "expiry_fields": ["expires_in", "expires"] }
}"#;

fn load(json: &str) -> ServiceConfig {
	ServiceConfig::from_json(json).expect("Dialect configuration should load.")
}

#[test]
fn github_tokens_never_expire() {
	let config = load(GITHUB);
	let request = exchange::build_exchange_request(&config, &credentials(), "gh-code");

	assert_eq!(config.joined_scopes(), Some("repo,user:email".into()));
	assert_eq!(request.header("accept"), Some("application/json"));

	let token = exchange::normalize_response(
		"access_token=gho_1&scope=repo%2Cuser%3Aemail&token_type=bearer",
		&config.normalization,
		macros::datetime!(2024-06-01 00:00 UTC),
	)
	.expect("Form-encoded GitHub response should normalize.");

	assert_eq!(token.end_of_life(), EndOfLife::NeverExpires);
	assert_eq!(token.extra_params().get("scope"), Some(&"repo,user:email".into()));
}

#[test]
fn paypal_errors_use_custom_aliases() {
	let config = load(PAYPAL);
	let request = exchange::build_exchange_request(&config, &credentials(), "pp-code");

	assert!(request.header("authorization").is_some_and(|value| value.starts_with("Basic ")));

	let err = exchange::normalize_response(
		r#"{"name":"INVALID_REQUEST","message":"Request is not well-formed"}"#,
		&config.normalization,
		macros::datetime!(2024-06-01 00:00 UTC),
	)
	.expect_err("PayPal error bodies should be classified.");

	assert!(matches!(
		err,
		Error::TokenExchange { ref message, status: None } if message == "Request is not well-formed"
	));
}

#[test]
fn bitrix_exchanges_over_get_and_reads_the_first_expiry_alias() {
	let config = load(BITRIX);
	let request = exchange::build_exchange_request(&config, &credentials(), "bx-code");

	assert_eq!(config.authorization_method, AuthorizationMethod::QueryStringV4);
	assert_eq!(request.method, HttpMethod::Get);
	assert_eq!(request.body, RequestBody::Empty);
	assert!(request.url.query().is_some_and(|query| query.contains("scope=user")));

	let issued_at = macros::datetime!(2024-06-01 00:00 UTC);
	let token = exchange::normalize_response(
		r#"{"access_token":"bx","expires_in":3600,"expires":1717203600,"member_id":"m1"}"#,
		&config.normalization,
		issued_at,
	)
	.expect("Bitrix response should normalize.");

	assert_eq!(token.end_of_life(), EndOfLife::At(issued_at + time::Duration::hours(1)));
	assert!(!token.extra_params().contains_key("expires"));
	assert_eq!(token.extra_params().get("member_id"), Some(&"m1".into()));
}

#[test]
fn invalid_documents_report_what_failed() {
	let err =
		ServiceConfig::from_json(&GITHUB.replace("https://github.com/login", "ftp://github.com"))
			.expect_err("Non-HTTP endpoints must be rejected.");

	let ConfigError::Load { source } = err else {
		panic!("Endpoint validation should fail while loading.");
	};

	assert!(
		source.inner().to_string().contains("absolute http(s) URL"),
		"Unexpected error: {source}"
	);

	let err = ServiceConfig::from_json(&GITHUB.replace("\"require_state\"", "\"require_csrf\""))
		.expect_err("Unknown quirks must be rejected.");
	let ConfigError::Load { source } = err else {
		panic!("Unknown quirks should fail while loading.");
	};

	assert!(source.path().to_string().starts_with("quirks"), "Unexpected path: {}", source.path());

	let built = config_builder("dup", "https://dup.example.com")
		.scope_delimiter(":")
		.scopes(ScopeList::new(["user:email"]).expect("Scope fixture should be valid."))
		.build();

	assert_eq!(
		built,
		Err(ServiceConfigError::ScopeContainsDelimiter { scope: "user:email".into() })
	);
}
