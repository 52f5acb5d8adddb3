//! Authorization URL construction with optional CSRF state.

// self
use crate::{
	_prelude::*,
	auth::AuthorizationState,
	exchange as engine,
	flows::Service,
	http::{TransportClient, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C, M> Service<C, M>
where
	C: ?Sized + TransportClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the URL the user agent is sent to.
	///
	/// When the service requires a state, one is generated (or taken from a `state` extra),
	/// stored under the service name, and appended to the URL. No network I/O happens here.
	pub fn authorization_url(&self, extras: &[(&str, &str)]) -> Result<Url> {
		const KIND: FlowKind = FlowKind::Authorization;

		let _span = FlowSpan::new(KIND, "authorization_url", self.name()).entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		obs::record_result(KIND, self.build_authorization_url(extras))
	}

	fn build_authorization_url(&self, extras: &[(&str, &str)]) -> Result<Url> {
		let extras = extras
			.iter()
			.map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
			.collect::<BTreeMap<_, _>>();
		let state = if self.config().quirks.require_state {
			let state = extras
				.get("state")
				.map(|value| AuthorizationState::from(value.as_str()))
				.unwrap_or_else(|| self.state_store.generate());

			self.state_store.store_state(self.name(), state.clone())?;

			Some(state)
		} else {
			None
		};

		Ok(engine::authorization_url(self.config(), self.credentials(), &extras, state.as_ref()))
	}
}
