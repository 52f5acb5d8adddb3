//! Authorization code exchange.

// self
use crate::{
	_prelude::*,
	auth::Token,
	exchange::{self as engine, ExchangeStage},
	flows::Service,
	http::{TransportClient, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C, M> Service<C, M>
where
	C: ?Sized + TransportClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Trades an authorization code for a token and stores it under the service name.
	///
	/// A provided `state` is validated (and consumed) before any network call; a mismatch fails
	/// with [`Error::AuthorizationStateMismatch`].
	pub async fn exchange(&self, code: &str, state: Option<&str>) -> Result<Token> {
		const KIND: FlowKind = FlowKind::Exchange;

		let span = FlowSpan::new(KIND, "exchange", self.name());

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let state_matches = match state {
					Some(candidate) => self.state_store.validate_state(self.name(), candidate)?,
					None => true,
				};

				if !state_matches {
					return Err(Error::AuthorizationStateMismatch {
						service: self.config().name.clone(),
					});
				}

				obs::record_stage(ExchangeStage::BuildingRequest.as_str());

				let request =
					engine::build_exchange_request(self.config(), self.credentials(), code);
				let token = self.dispatch_token_request(request).await?;

				self.storage.store(self.name(), token.clone())?;

				Ok(token)
			})
			.await;

		obs::record_result(KIND, result)
	}
}
