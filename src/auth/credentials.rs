//! Consumer credentials registered with a provider.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, Secret},
	error::ConfigError,
};

/// Consumer identifier, consumer secret, and callback URL for one service.
///
/// Credentials are immutable once built and are never written to token storage.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	consumer_id: ClientId,
	consumer_secret: Secret,
	callback_url: Url,
}
impl Credentials {
	/// Validates and bundles the consumer credentials.
	pub fn new(
		consumer_id: impl AsRef<str>,
		consumer_secret: impl Into<String>,
		callback_url: Url,
	) -> Result<Self, ConfigError> {
		let consumer_id = consumer_id.as_ref();

		if consumer_id.is_empty() {
			return Err(ConfigError::MissingCredential { field: "consumer_id" });
		}

		let consumer_id = ClientId::new(consumer_id)?;
		let consumer_secret = Secret::new(consumer_secret);

		if consumer_secret.is_empty() {
			return Err(ConfigError::MissingCredential { field: "consumer_secret" });
		}

		Ok(Self { consumer_id, consumer_secret, callback_url })
	}

	/// Same as [`Credentials::new`] but parses the callback URL from a string.
	pub fn parse(
		consumer_id: impl AsRef<str>,
		consumer_secret: impl Into<String>,
		callback_url: &str,
	) -> Result<Self, ConfigError> {
		if callback_url.is_empty() {
			return Err(ConfigError::MissingCredential { field: "callback_url" });
		}

		let callback_url =
			Url::parse(callback_url).map_err(|source| ConfigError::InvalidCallback { source })?;

		Self::new(consumer_id, consumer_secret, callback_url)
	}

	/// OAuth `client_id`.
	pub fn consumer_id(&self) -> &ClientId {
		&self.consumer_id
	}

	/// OAuth `client_secret`.
	pub fn consumer_secret(&self) -> &Secret {
		&self.consumer_secret
	}

	/// Redirect URI registered with the provider.
	pub fn callback_url(&self) -> &Url {
		&self.callback_url
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("consumer_id", &self.consumer_id)
			.field("consumer_secret", &"<redacted>")
			.field("callback_url", &self.callback_url.as_str())
			.finish()
	}
}
