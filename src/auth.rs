//! Auth-domain identifiers, credentials, scopes, states, and the token model.

pub mod credentials;
pub mod id;
pub mod scope;
pub mod secret;
pub mod state;
pub mod token;

pub use credentials::*;
pub use id::*;
pub use scope::*;
pub use secret::*;
pub use state::*;
pub use token::*;
