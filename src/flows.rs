//! High-level operations bound to one configured service.
//!
//! A [`Service`] pairs an immutable [`ServiceConfig`] with the consumer [`Credentials`], a
//! transport, token storage, and a state store. Every provider runs through the same
//! engine; provider differences live entirely in the configuration.

pub mod api;
pub mod authorization;
pub mod exchange;
pub mod refresh;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Token},
	exchange::{self as engine, ExchangeStage},
	http::{self, OutboundRequest, TransportClient, TransportErrorMapper},
	obs,
	provider::ServiceConfig,
	store::{MemoryStore, StateStore, TokenStorage},
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Service specialized for the crate's default reqwest transport stack.
pub type ReqwestService = Service<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Runs authorization, exchange, refresh, and API calls for a single service.
#[derive(Clone)]
pub struct Service<C, M>
where
	C: ?Sized + TransportClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Token slots; every successful exchange overwrites the slot of this service.
	pub storage: Arc<dyn TokenStorage>,
	/// Pending CSRF states.
	pub state_store: Arc<dyn StateStore>,
	config: ServiceConfig,
	credentials: Credentials,
}
impl<C, M> Service<C, M>
where
	C: ?Sized + TransportClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a service that reuses the caller-provided transport + mapper pair.
	///
	/// Tokens and states start out in a shared [`MemoryStore`]; replace them with
	/// [`Service::with_token_storage`] and [`Service::with_state_store`].
	pub fn with_http_client(
		config: ServiceConfig,
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		let memory = Arc::new(MemoryStore::default());

		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			storage: memory.clone(),
			state_store: memory,
			config,
			credentials,
		}
	}

	/// Replaces the token storage.
	pub fn with_token_storage(mut self, storage: Arc<dyn TokenStorage>) -> Self {
		self.storage = storage;

		self
	}

	/// Replaces the state store.
	pub fn with_state_store(mut self, state_store: Arc<dyn StateStore>) -> Self {
		self.state_store = state_store;

		self
	}

	/// Service configuration.
	pub fn config(&self) -> &ServiceConfig {
		&self.config
	}

	/// Consumer credentials.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Service name keying token slots and pending states.
	pub fn name(&self) -> &str {
		self.config.name.as_str()
	}

	/// Returns the token stored for this service.
	pub fn stored_token(&self) -> Result<Token> {
		Ok(self.storage.fetch(self.name())?)
	}

	/// Returns `true` when a token is stored for this service.
	pub fn has_token(&self) -> Result<bool> {
		Ok(self.storage.has(self.name())?)
	}

	/// Empties the token slot of this service.
	pub fn clear_token(&self) -> Result<()> {
		Ok(self.storage.clear(self.name())?)
	}

	/// Sends a token endpoint request and normalizes the response.
	pub(crate) async fn dispatch_token_request(&self, request: OutboundRequest) -> Result<Token> {
		obs::record_stage(ExchangeStage::AwaitingResponse.as_str());

		let issued_at = OffsetDateTime::now_utc();
		let body = http::execute(self.http_client.as_ref(), self.transport_mapper.as_ref(), request)
			.await
			.map_err(|e| engine::recover_provider_error(e, &self.config.normalization))?;

		obs::record_stage(ExchangeStage::Normalizing.as_str());

		let body = engine::decode_utf8(body)?;

		engine::normalize_response(&body, &self.config.normalization, issued_at)
	}
}
#[cfg(feature = "reqwest")]
impl Service<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a new service backed by the default reqwest transport.
	pub fn new(config: ServiceConfig, credentials: Credentials) -> Self {
		Self::with_http_client(
			config,
			credentials,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Debug for Service<C, M>
where
	C: ?Sized + TransportClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Service")
			.field("config", &self.config)
			.field("credentials", &self.credentials)
			.finish()
	}
}
