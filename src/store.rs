//! Storage contracts for tokens and pending authorization states, plus built-in backends.
//!
//! Both contracts are synchronous: every operation is a single lock acquisition (plus a file
//! write for [`FileStore`]), so the transport call stays the only suspension point of an
//! exchange.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationState, Token},
};

/// Token slots keyed by service name; each slot holds at most one token.
pub trait TokenStorage
where
	Self: Send + Sync,
{
	/// Persists `token`, replacing whatever the slot held.
	fn store(&self, service: &str, token: Token) -> Result<(), StoreError>;

	/// Returns the stored token or [`StoreError::TokenNotFound`].
	fn fetch(&self, service: &str) -> Result<Token, StoreError>;

	/// Returns `true` when the slot holds a token.
	fn has(&self, service: &str) -> Result<bool, StoreError>;

	/// Empties one slot.
	fn clear(&self, service: &str) -> Result<(), StoreError>;

	/// Empties every slot.
	fn clear_all(&self) -> Result<(), StoreError>;
}

/// Pending CSRF states keyed by service name.
pub trait StateStore
where
	Self: Send + Sync,
{
	/// Produces a fresh, unpredictable state.
	fn generate(&self) -> AuthorizationState {
		AuthorizationState::generate()
	}

	/// Records `state` as the pending state of `service`, replacing any previous one.
	fn store_state(&self, service: &str, state: AuthorizationState) -> Result<(), StoreError>;

	/// Compares `candidate` with the pending state.
	///
	/// A match consumes the pending state, so a replay fails. A mismatch leaves it in place.
	fn validate_state(&self, service: &str, candidate: &str) -> Result<bool, StoreError>;

	/// Drops the pending state of `service`.
	fn clear_state(&self, service: &str) -> Result<(), StoreError>;
}

/// Error type produced by [`TokenStorage`] and [`StateStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Snapshot could not be encoded or decoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// The service has no stored token.
	#[error("No token is stored for service `{service}`.")]
	TokenNotFound {
		/// Service whose slot is empty.
		service: String,
	},
}
