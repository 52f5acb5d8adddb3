// crates.io
use oauth2::HttpClientError;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Maps HTTP transport failures into engine [`Error`] values.
///
/// Only failures that never produced an HTTP response reach the mapper; non-2xx responses are
/// classified by the engine itself.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an engine error.
	fn map_transport_error(&self, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, error: HttpClientError<ReqwestError>) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			other => map_common(other),
		}
	}
}

/// Mapper for any transport error type; every transport failure becomes a network error.
#[derive(Clone, Debug, Default)]
pub struct GenericTransportErrorMapper;
impl<E> TransportErrorMapper<E> for GenericTransportErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, error: HttpClientError<E>) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
			other => map_common(other),
		}
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(error: ReqwestError) -> Error {
	if error.is_builder() {
		return ConfigError::from(error).into();
	}
	if error.is_timeout() {
		return TransportError::Timeout.into();
	}

	TransportError::from(error).into()
}

fn map_common<E>(error: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match error {
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unclassified transport failure".into() }.into(),
	}
}
