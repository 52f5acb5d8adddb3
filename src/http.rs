//! Transport primitives for token exchanges and authorized API calls.
//!
//! The engine never talks to an HTTP stack directly. It assembles an [`OutboundRequest`],
//! converts it into an [`oauth2::HttpRequest`], and hands it to a [`TransportClient`] handle.
//! Non-2xx responses come back as [`TransportError::Status`] so callers can tell provider
//! rejections apart from network failures.

/// Error mapping helpers for transport failures.
pub mod mapper;
/// Outbound request construction.
pub mod request;

pub use mapper::*;
pub use request::*;

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
use oauth2::{
	AsyncHttpClient, HttpClientError,
	http::{HeaderMap, header::RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};

/// Abstraction over HTTP transports capable of executing provider requests.
///
/// The trait is the engine's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so they can be shared across services, and the handles they return
/// must own whatever state is required so their request futures remain `Send`.
pub trait TransportClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single request.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle for one request.
	fn handle(&self) -> Self::Handle;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints answer directly, so a custom [`ReqwestClient`] should be configured not to
/// follow redirects.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TransportClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`AsyncHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Sends `request` through `client` and returns the raw body of a 2xx response.
pub(crate) async fn execute<C, M>(
	client: &C,
	mapper: &M,
	request: OutboundRequest,
) -> Result<Vec<u8>>
where
	C: ?Sized + TransportClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let request = request.into_http_request()?;
	let handle = client.handle();
	let response = handle.call(request).await.map_err(|e| mapper.map_transport_error(e))?;
	let status = response.status();

	if !status.is_success() {
		let retry_after = parse_retry_after(response.headers());
		let body = String::from_utf8_lossy(response.body()).into_owned();

		return Err(TransportError::Status { status: status.as_u16(), retry_after, body }.into());
	}

	Ok(response.into_body())
}

/// Reads a `Retry-After` header expressed either in seconds or as an RFC 2822 date.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<i64>() {
		return (secs >= 0).then_some(Duration::seconds(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
