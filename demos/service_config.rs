//! Loads provider dialects from JSON and shows how each one shapes requests and tokens, without
//! touching the network.

// crates.io
use color_eyre::Result;
// self
use oauth2_normalizer::{
	auth::Credentials,
	exchange::{self, RESERVED_AUTHORIZATION_PARAMS},
	provider::ServiceConfig,
};

const DIALECTS: [(&str, &str); 2] = [
	(
		r#"{
			"name": "github",
			"authorization_endpoint": "https://github.com/login/oauth/authorize",
			"token_endpoint": "https://github.com/login/oauth/access_token",
			"api_base_uri": "https://api.github.com/",
			"scopes": ["repo", "user"],
			"scope_delimiter": ",",
			"authorization_method": "header_token",
			"extra_authorization_headers": { "Accept": "application/json" },
			"normalization": { "missing_expiry": "never_expires" }
		}"#,
		"access_token=gho_demo&scope=repo%2Cuser&token_type=bearer",
	),
	(
		r#"{
			"name": "facebook",
			"authorization_endpoint": "https://www.facebook.com/dialog/oauth",
			"token_endpoint": "https://graph.facebook.com/oauth/access_token",
			"api_base_uri": "https://graph.facebook.com/",
			"scopes": ["email", "public_profile"],
			"scope_delimiter": ",",
			"authorization_method": "query_string",
			"quirks": { "authorization_params": { "display": "popup" } },
			"normalization": { "expiry_fields": ["expires"] }
		}"#,
		"access_token=EAAB_demo&expires=5183999",
	),
];

fn main() -> Result<()> {
	color_eyre::install()?;

	let credentials =
		Credentials::parse("demo-client", "demo-secret", "https://app.example.com/callback")?;

	println!("Reserved authorization parameters: {RESERVED_AUTHORIZATION_PARAMS:?}.");

	for (json, sample_response) in DIALECTS {
		let config = ServiceConfig::from_json(json)?;
		let url = exchange::authorization_url(&config, &credentials, &Default::default(), None);
		let request = exchange::build_exchange_request(&config, &credentials, "sample-code");
		let token = exchange::normalize_response(
			sample_response,
			&config.normalization,
			time::OffsetDateTime::now_utc(),
		)?;

		println!("[{}]", config.name);
		println!("  authorize: {url}");
		println!("  exchange:  {} {}", request.method, request.url);
		println!("  injection: {}", config.authorization_method);
		println!("  token:     {:?} (extras: {:?})", token.end_of_life(), token.extra_params());
	}

	Ok(())
}
