//! File-backed store for lightweight deployments, CLIs, and bots.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{AuthorizationState, Token},
	store::{StateStore, StoreError, TokenStorage},
};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Snapshot {
	tokens: BTreeMap<String, Token>,
	states: BTreeMap<String, AuthorizationState>,
}

/// Persists tokens and pending states to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the snapshot file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(Snapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(Snapshot::default());
		}

		let mut de = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut de).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {} at `{}`: {}", path.display(), e.path(), e.inner()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	/// Applies `change` to a copy of the snapshot and swaps it in once the copy is on disk.
	///
	/// `change` reports whether it modified the copy; untouched snapshots are not rewritten.
	/// A failed write leaves the in-memory snapshot as it was.
	fn commit<R>(&self, change: impl FnOnce(&mut Snapshot) -> (R, bool)) -> Result<R, StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();
		let (outcome, dirty) = change(&mut next);

		if dirty {
			self.persist(&next)?;

			*guard = next;
		}

		Ok(outcome)
	}

	fn persist(&self, contents: &Snapshot) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStorage for FileStore {
	fn store(&self, service: &str, token: Token) -> Result<(), StoreError> {
		self.commit(|snapshot| {
			snapshot.tokens.insert(service.to_owned(), token);

			((), true)
		})
	}

	fn fetch(&self, service: &str) -> Result<Token, StoreError> {
		self.inner
			.read()
			.tokens
			.get(service)
			.cloned()
			.ok_or_else(|| StoreError::TokenNotFound { service: service.to_owned() })
	}

	fn has(&self, service: &str) -> Result<bool, StoreError> {
		Ok(self.inner.read().tokens.contains_key(service))
	}

	fn clear(&self, service: &str) -> Result<(), StoreError> {
		self.commit(|snapshot| ((), snapshot.tokens.remove(service).is_some()))
	}

	fn clear_all(&self) -> Result<(), StoreError> {
		self.commit(|snapshot| {
			snapshot.tokens.clear();

			((), true)
		})
	}
}
impl StateStore for FileStore {
	fn store_state(&self, service: &str, state: AuthorizationState) -> Result<(), StoreError> {
		self.commit(|snapshot| {
			snapshot.states.insert(service.to_owned(), state);

			((), true)
		})
	}

	fn validate_state(&self, service: &str, candidate: &str) -> Result<bool, StoreError> {
		self.commit(|snapshot| {
			let matched =
				snapshot.states.get(service).is_some_and(|pending| pending.matches(candidate));

			if matched {
				snapshot.states.remove(service);
			}

			(matched, matched)
		})
	}

	fn clear_state(&self, service: &str) -> Result<(), StoreError> {
		self.commit(|snapshot| ((), snapshot.states.remove(service).is_some()))
	}
}
