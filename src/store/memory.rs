//! Thread-safe in-memory store for tests, demos, and single-process deployments.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationState, Token},
	store::{StateStore, StoreError, TokenStorage},
};

/// Keeps tokens and pending states in process memory.
///
/// Clones share the same maps.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	tokens: Arc<RwLock<HashMap<String, Token>>>,
	states: Arc<Mutex<HashMap<String, AuthorizationState>>>,
}
impl MemoryStore {
	/// Returns the number of occupied token slots.
	pub fn len(&self) -> usize {
		self.tokens.read().len()
	}

	/// Returns `true` when no token is stored.
	pub fn is_empty(&self) -> bool {
		self.tokens.read().is_empty()
	}
}
impl TokenStorage for MemoryStore {
	fn store(&self, service: &str, token: Token) -> Result<(), StoreError> {
		self.tokens.write().insert(service.to_owned(), token);

		Ok(())
	}

	fn fetch(&self, service: &str) -> Result<Token, StoreError> {
		self.tokens
			.read()
			.get(service)
			.cloned()
			.ok_or_else(|| StoreError::TokenNotFound { service: service.to_owned() })
	}

	fn has(&self, service: &str) -> Result<bool, StoreError> {
		Ok(self.tokens.read().contains_key(service))
	}

	fn clear(&self, service: &str) -> Result<(), StoreError> {
		self.tokens.write().remove(service);

		Ok(())
	}

	fn clear_all(&self) -> Result<(), StoreError> {
		self.tokens.write().clear();

		Ok(())
	}
}
impl StateStore for MemoryStore {
	fn store_state(&self, service: &str, state: AuthorizationState) -> Result<(), StoreError> {
		self.states.lock().insert(service.to_owned(), state);

		Ok(())
	}

	fn validate_state(&self, service: &str, candidate: &str) -> Result<bool, StoreError> {
		let mut states = self.states.lock();
		let matched = states.get(service).is_some_and(|pending| pending.matches(candidate));

		if matched {
			states.remove(service);
		}

		Ok(matched)
	}

	fn clear_state(&self, service: &str) -> Result<(), StoreError> {
		self.states.lock().remove(service);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::thread;
	// self
	use super::*;

	fn token(access: &str) -> Token {
		Token::builder().access_token(access).build().expect("Token fixture should build.")
	}

	#[test]
	fn slots_hold_one_token_each() {
		let store = MemoryStore::default();

		assert!(!store.has("github").expect("Lookup should succeed."));
		assert_eq!(
			store.fetch("github"),
			Err(StoreError::TokenNotFound { service: "github".into() })
		);

		store.store("github", token("first")).expect("Store should succeed.");
		store.store("github", token("second")).expect("Store should succeed.");
		store.store("google", token("other")).expect("Store should succeed.");

		assert_eq!(store.len(), 2);
		assert_eq!(
			store.fetch("github").expect("Token should be stored.").access_token().expose(),
			"second"
		);

		store.clear("github").expect("Clear should succeed.");

		assert!(!store.has("github").expect("Lookup should succeed."));
		assert!(store.has("google").expect("Lookup should succeed."));

		store.clear_all().expect("Clear all should succeed.");

		assert!(store.is_empty());
	}

	#[test]
	fn states_are_single_use() {
		let store = MemoryStore::default();
		let state = store.generate();

		store.store_state("github", state.clone()).expect("State should be stored.");

		assert!(!store.validate_state("github", "forged").expect("Validation should run."));
		assert!(store.validate_state("github", state.as_str()).expect("Validation should run."));
		assert!(!store.validate_state("github", state.as_str()).expect("Validation should run."));
	}

	#[test]
	fn states_are_scoped_per_service_and_clearable() {
		let store = MemoryStore::default();

		store.store_state("github", "s1".into()).expect("State should be stored.");

		assert!(!store.validate_state("google", "s1").expect("Validation should run."));

		store.clear_state("github").expect("Clear should succeed.");

		assert!(!store.validate_state("github", "s1").expect("Validation should run."));
	}

	#[test]
	fn concurrent_validations_succeed_once() {
		let store = MemoryStore::default();

		store.store_state("github", "race".into()).expect("State should be stored.");

		let successes = thread::scope(|scope| {
			let handles = (0..8)
				.map(|_| {
					scope.spawn(|| {
						store.validate_state("github", "race").expect("Validation should run.")
					})
				})
				.collect::<Vec<_>>();

			handles
				.into_iter()
				.map(|handle| handle.join().expect("Validation thread should not panic."))
				.filter(|matched| *matched)
				.count()
		});

		assert_eq!(successes, 1);
	}
}
