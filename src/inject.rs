//! Credential injection onto outbound requests.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	http::OutboundRequest,
	provider::{AuthorizationMethod, TokenPlacement},
};

/// Credential to place on an outbound request.
#[derive(Clone, Copy)]
pub enum Credential<'a> {
	/// Client credentials sent to the token endpoint.
	Client {
		/// Client identifier.
		client_id: &'a str,
		/// Client secret.
		client_secret: &'a str,
	},
	/// Access token sent to the provider API.
	AccessToken(&'a str),
}
impl<'a> Credential<'a> {
	/// Borrows the client credentials of a service.
	pub fn client(credentials: &'a Credentials) -> Self {
		Self::Client {
			client_id: credentials.consumer_id().as_str(),
			client_secret: credentials.consumer_secret().expose(),
		}
	}
}
impl Debug for Credential<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Client { client_id, .. } => f
				.debug_struct("Client")
				.field("client_id", client_id)
				.field("client_secret", &"<redacted>")
				.finish(),
			Self::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
		}
	}
}

/// Places `credential` on `request` according to `method`.
///
/// Client credentials always travel as `client_id`/`client_secret` request parameters. Access
/// tokens go wherever the method's [`TokenPlacement`] says; header placements replace any
/// existing `Authorization` header.
pub fn inject_credentials(
	method: AuthorizationMethod,
	credential: &Credential<'_>,
	mut request: OutboundRequest,
) -> OutboundRequest {
	match *credential {
		Credential::Client { client_id, client_secret } => {
			request.push_param("client_id", client_id);
			request.push_param("client_secret", client_secret);
		},
		Credential::AccessToken(token) => match method.placement() {
			TokenPlacement::Header { scheme } =>
				request.set_header("Authorization", format!("{scheme} {token}")),
			TokenPlacement::Query { param } => request.push_query(param, token),
		},
	}

	request
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::http::HttpMethod;

	fn request(method: HttpMethod) -> OutboundRequest {
		OutboundRequest::new(
			method,
			Url::parse("https://api.example.com/v1/me").expect("Fixture URL should parse."),
		)
	}

	#[test]
	fn header_strategies_set_the_authorization_scheme() {
		for (method, expected) in [
			(AuthorizationMethod::HeaderOauth, "OAuth abc"),
			(AuthorizationMethod::HeaderBearer, "Bearer abc"),
			(AuthorizationMethod::HeaderToken, "token abc"),
		] {
			let injected =
				inject_credentials(method, &Credential::AccessToken("abc"), request(HttpMethod::Get));

			assert_eq!(injected.header("authorization"), Some(expected));
			assert_eq!(injected.url.query(), None);
		}
	}

	#[test]
	fn query_strategies_use_provider_parameter_names() {
		for (method, expected) in [
			(AuthorizationMethod::QueryString, "access_token=abc"),
			(AuthorizationMethod::QueryStringV2, "oauth2_access_token=abc"),
			(AuthorizationMethod::QueryStringV3, "apikey=abc"),
			(AuthorizationMethod::QueryStringV4, "auth=abc"),
			(AuthorizationMethod::QueryStringV5, "user_token=abc"),
		] {
			let injected =
				inject_credentials(method, &Credential::AccessToken("abc"), request(HttpMethod::Post));

			assert_eq!(injected.url.query(), Some(expected));
			assert!(injected.headers.is_empty());
		}
	}

	#[test]
	fn client_credentials_are_parameters_for_every_strategy() {
		let credential = Credential::Client { client_id: "id", client_secret: "shh" };

		for method in AuthorizationMethod::ALL {
			let post = inject_credentials(method, &credential, request(HttpMethod::Post));

			assert_eq!(post.param("client_id"), Some("id".into()));
			assert_eq!(post.param("client_secret"), Some("shh".into()));
			assert_eq!(post.url.query(), None);
			assert!(post.header("authorization").is_none());

			let get = inject_credentials(method, &credential, request(HttpMethod::Get));

			assert_eq!(get.url.query(), Some("client_id=id&client_secret=shh"));
		}
	}

	#[test]
	fn debug_redacts_secrets() {
		let client = Credential::Client { client_id: "id", client_secret: "shh" };

		assert!(!format!("{client:?}").contains("shh"));
		assert!(!format!("{:?}", Credential::AccessToken("tok")).contains("tok"));
	}
}
