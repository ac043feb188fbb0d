//! Credential persistence.
//!
//! - [`KeyValueStorage`]: durable string key-value backend
//! - [`CredentialStore`]: profile + bearer token + optional expiry on top of it
//!
//! A credential exists only when both the profile and the token are stored
//! and the profile parses; anything else reads as "signed out".

mod storage;
mod store;
mod types;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{CredentialStore, EXPIRY_KEY, TOKEN_KEY, USER_KEY};
pub use types::{Credential, UserProfile};
