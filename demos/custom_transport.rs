//! Plugs a non-reqwest transport and its own error mapper into a service.
//!
//! 1. Implement [`TransportClient`] and hand out an [`AsyncHttpClient`] handle per request.
//! 2. Implement [`TransportErrorMapper`] for the transport's error type.
//! 3. Pass both to [`Service::with_http_client`].

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
};
// crates.io
use color_eyre::Result;
// self
use oauth2_normalizer::{
	auth::{Credentials, ServiceName},
	error::{Error, TransportError},
	flows::Service,
	http::{TransportClient, TransportErrorMapper},
	oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	provider::{ResponseNormalization, ServiceConfig},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ServiceConfig::builder(ServiceName::new("mock-provider")?)
		.authorization_endpoint(Url::parse("https://provider.example.com/authorize")?)
		.token_endpoint(Url::parse("https://provider.example.com/token")?)
		.normalization(ResponseNormalization::default().expiry_fields(["expires"]))
		.build()?;
	let credentials =
		Credentials::parse("demo-client", "demo-secret", "https://app.example.com/callback")?;
	let service: Service<MockHttpClient, MockTransportErrorMapper> = Service::with_http_client(
		config.clone(),
		credentials.clone(),
		MockHttpClient { behavior: MockBehavior::Success },
		MockTransportErrorMapper,
	);
	let token = service.exchange("demo-code", None).await?;

	println!(
		"Access token issued by the mock transport: {} ({:?}).",
		token.access_token().expose(),
		token.end_of_life()
	);

	for behavior in [
		MockBehavior::Fail(MockTransportError::DnsFailure { host: "provider.example.com" }),
		MockBehavior::Fail(MockTransportError::BackendTimeout),
	] {
		let failing: Service<MockHttpClient, MockTransportErrorMapper> = Service::with_http_client(
			config.clone(),
			credentials.clone(),
			MockHttpClient { behavior },
			MockTransportErrorMapper,
		);

		match failing.exchange("demo-code", None).await {
			Ok(_) => println!("Mock transport unexpectedly produced a token."),
			Err(e) => println!("Mapped failure (retryable: {}): {e}", e.is_retryable()),
		}
	}

	Ok(())
}

#[derive(Clone, Debug)]
enum MockTransportError {
	DnsFailure { host: &'static str },
	BackendTimeout,
}
impl Display for MockTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::DnsFailure { host } => write!(f, "DNS lookup failed for {host}"),
			Self::BackendTimeout => write!(f, "Token endpoint timed out"),
		}
	}
}
impl StdError for MockTransportError {}

#[derive(Clone)]
enum MockBehavior {
	Success,
	Fail(MockTransportError),
}

#[derive(Clone)]
struct MockHttpClient {
	behavior: MockBehavior,
}
impl TransportClient for MockHttpClient {
	type Handle = MockHttpClient;
	type TransportError = MockTransportError;

	fn handle(&self) -> Self::Handle {
		self.clone()
	}
}
impl<'a> AsyncHttpClient<'a> for MockHttpClient {
	type Error = HttpClientError<MockTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, _request: HttpRequest) -> Self::Future {
		let behavior = self.behavior.clone();

		Box::pin(async move {
			match behavior {
				// A form-encoded body with a provider-specific expiry alias.
				MockBehavior::Success =>
					Ok(HttpResponse::new(b"access_token=mock-access&expires=3600".to_vec())),
				// `HttpClientError::Reqwest` carries any boxed transport error, not only reqwest's.
				MockBehavior::Fail(error) => Err(HttpClientError::Reqwest(Box::new(error))),
			}
		})
	}
}

#[derive(Clone, Default)]
struct MockTransportErrorMapper;
impl TransportErrorMapper<MockTransportError> for MockTransportErrorMapper {
	fn map_transport_error(&self, error: HttpClientError<MockTransportError>) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => match *inner {
				MockTransportError::BackendTimeout => TransportError::Timeout.into(),
				other => TransportError::network(other).into(),
			},
			HttpClientError::Other(message) => TransportError::Other { message }.into(),
			_ => TransportError::Other { message: "Unclassified mock failure".into() }.into(),
		}
	}
}
