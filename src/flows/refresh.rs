//! Explicit refresh token exchange.
//!
//! Refreshing is never automatic: callers decide when a token needs replacing, typically after
//! [`Service::request`] fails with [`Error::TokenExpired`].

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::ConfigError,
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
	/// Trades the refresh token of `token` for a new token and stores it.
	///
	/// Providers that do not rotate refresh tokens keep the previous one.
	pub async fn refresh_access_token(&self, token: &Token) -> Result<Token> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_access_token", self.name());

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let refresh_token = token.refresh_token().cloned().ok_or_else(|| {
					ConfigError::MissingRefreshToken { service: self.config().name.clone() }
				})?;

				obs::record_stage(ExchangeStage::BuildingRequest.as_str());

				let request =
					engine::build_refresh_request(self.config(), self.credentials(), &refresh_token);
				let mut fresh = self.dispatch_token_request(request).await?;

				if fresh.refresh_token().is_none() {
					fresh.set_refresh_token(Some(refresh_token));
				}

				self.storage.store(self.name(), fresh.clone())?;

				Ok(fresh)
			})
			.await;

		obs::record_result(KIND, result)
	}
}
