//! Error taxonomy shared by the exchange engine, the stores, and the transport layer.

// self
use crate::{_prelude::*, auth::ServiceName};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(#[source] crate::store::StoreError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, non-2xx status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider response could not be decoded or lacked required fields.
	#[error(transparent)]
	ResponseParse(#[from] ResponseParseError),

	/// The `state` returned by the provider does not match the pending one.
	#[error("Authorization state mismatch for service `{service}`.")]
	AuthorizationStateMismatch {
		/// Service whose state validation failed.
		service: ServiceName,
	},
	/// Provider explicitly reported an error during a token request.
	#[error("Error in retrieving token: \"{message}\".")]
	TokenExchange {
		/// Provider message, passed through verbatim.
		message: String,
		/// HTTP status code, when the error arrived with a non-2xx response.
		status: Option<u16>,
	},
	/// No token is stored for the service.
	#[error("No token is stored for service `{service}`.")]
	TokenNotFound {
		/// Service whose token slot is empty.
		service: String,
	},
	/// Stored token is past its end of life.
	#[error("Token for service `{service}` expired at {expired_at}.")]
	TokenExpired {
		/// Service owning the expired token.
		service: ServiceName,
		/// End of life recorded on the token.
		expired_at: OffsetDateTime,
	},
}
impl Error {
	/// Returns the flat error kind, suitable for telemetry labels and retry decisions.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Storage(_) => ErrorKind::Storage,
			Error::Config(_) => ErrorKind::Configuration,
			Error::Transport(_) => ErrorKind::Transport,
			Error::ResponseParse(_) => ErrorKind::ResponseParse,
			Error::AuthorizationStateMismatch { .. } => ErrorKind::AuthorizationStateMismatch,
			Error::TokenExchange { .. } => ErrorKind::TokenExchange,
			Error::TokenNotFound { .. } => ErrorKind::TokenNotFound,
			Error::TokenExpired { .. } => ErrorKind::TokenExpired,
		}
	}

	/// Returns `true` when a caller-driven retry may succeed.
	///
	/// Only transport failures qualify; nothing is retried internally.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Error::Transport(_))
	}
}
impl From<crate::store::StoreError> for Error {
	fn from(e: crate::store::StoreError) -> Self {
		match e {
			crate::store::StoreError::TokenNotFound { service } => Error::TokenNotFound { service },
			other => Error::Storage(other),
		}
	}
}

/// Flat discriminant of [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// See [`Error::Config`].
	Configuration,
	/// See [`Error::AuthorizationStateMismatch`].
	AuthorizationStateMismatch,
	/// See [`Error::Transport`].
	Transport,
	/// See [`Error::ResponseParse`].
	ResponseParse,
	/// See [`Error::TokenExchange`].
	TokenExchange,
	/// See [`Error::TokenNotFound`].
	TokenNotFound,
	/// See [`Error::TokenExpired`].
	TokenExpired,
	/// See [`Error::Storage`].
	Storage,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Configuration => "configuration",
			ErrorKind::AuthorizationStateMismatch => "authorization_state_mismatch",
			ErrorKind::Transport => "transport",
			ErrorKind::ResponseParse => "response_parse",
			ErrorKind::TokenExchange => "token_exchange",
			ErrorKind::TokenNotFound => "token_not_found",
			ErrorKind::TokenExpired => "token_expired",
			ErrorKind::Storage => "storage",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Service configuration failed validation.
	#[error(transparent)]
	InvalidService(#[from] crate::provider::ServiceConfigError),
	/// Service configuration JSON could not be decoded.
	#[error("Service configuration could not be loaded.")]
	Load {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A required credential was empty.
	#[error("Credential `{field}` is required.")]
	MissingCredential {
		/// Name of the missing credential field.
		field: &'static str,
	},
	/// Callback URL cannot be parsed.
	#[error("Callback URL is invalid.")]
	InvalidCallback {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Identifier validation failed.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Scope list validation failed.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// API path cannot be resolved into a URL.
	#[error("API path `{path}` cannot be resolved.")]
	InvalidApiPath {
		/// Caller-supplied path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A relative API path was used but the service has no API base URI.
	#[error("Service `{service}` has no API base URI for relative path `{path}`.")]
	MissingApiBaseUri {
		/// Service lacking the base URI.
		service: ServiceName,
		/// Caller-supplied path.
		path: String,
	},
	/// Refresh was requested for a token without a refresh secret.
	#[error("Token for service `{service}` carries no refresh token.")]
	MissingRefreshToken {
		/// Service owning the token.
		service: ServiceName,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, non-2xx).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Request did not complete before the transport deadline.
	#[error("Request timed out while calling the provider.")]
	Timeout,
	/// Provider answered with a non-2xx status.
	#[error("Provider responded with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Retry-After hint expressed as a relative duration.
		retry_after: Option<Duration>,
		/// Raw response body, kept for error classification.
		body: String,
	},
	/// Transport reported a failure it could not classify.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns the HTTP status code, if the failure carried one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Provider responses that cannot be turned into a token.
#[derive(Debug, ThisError)]
pub enum ResponseParseError {
	/// Body is neither a JSON object nor form-encoded.
	#[error("Response body is neither JSON nor form-encoded: {body_preview}.")]
	Undecodable {
		/// Leading characters of the body.
		body_preview: String,
		/// JSON parsing failure, when the body was not valid JSON at all.
		#[source]
		source: Option<serde_json::Error>,
	},
	/// Decoded mapping lacks a usable `access_token`.
	#[error("Response does not contain an access token.")]
	MissingAccessToken,
	/// A recognized field has an unusable value.
	#[error("Response field `{field}` is invalid: {reason}.")]
	InvalidField {
		/// Offending field name.
		field: String,
		/// Short description of the problem.
		reason: &'static str,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_miss_maps_to_token_not_found() {
		let err: Error = StoreError::TokenNotFound { service: "github".into() }.into();

		assert!(matches!(err, Error::TokenNotFound { ref service } if service == "github"));
		assert_eq!(err.kind(), ErrorKind::TokenNotFound);
		assert!(!err.is_retryable());
	}

	#[test]
	fn backend_failures_keep_their_source() {
		let store_error = StoreError::Backend { message: "disk full".into() };
		let err: Error = store_error.clone().into();

		assert!(matches!(err, Error::Storage(_)));
		assert!(err.to_string().contains("disk full"));

		let source =
			StdError::source(&err).expect("Storage error should expose the store error as source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn only_transport_errors_are_retryable() {
		let transport: Error = TransportError::Timeout.into();
		let exchange = Error::TokenExchange { message: "invalid_grant".into(), status: None };

		assert!(transport.is_retryable());
		assert!(!exchange.is_retryable());
		assert_eq!(exchange.kind().as_str(), "token_exchange");
	}

	#[test]
	fn token_exchange_message_is_verbatim() {
		let err = Error::TokenExchange { message: "x".into(), status: Some(400) };

		assert_eq!(err.to_string(), "Error in retrieving token: \"x\".");
	}
}
