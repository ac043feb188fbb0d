//! Credential store on top of a [`KeyValueStorage`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::storage::KeyValueStorage;
use super::types::{Credential, UserProfile};
use crate::error::Result;

pub const USER_KEY: &str = "pegasus_user";
pub const TOKEN_KEY: &str = "pegasus_token";
pub const EXPIRY_KEY: &str = "pegasus_token_expiry";

/// Process-wide credential store.
///
/// Cheap to clone; all clones share the same backend. Nothing is cached here,
/// every read goes to the storage so a clear from any component is seen
/// by all others immediately.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Persist a credential, overwriting any previous one.
    ///
    /// `remember_days` records `now + days` as the expiry; `None` drops any
    /// previously recorded expiry. If any write fails the store is cleared,
    /// so a failed save leaves the user signed out rather than half switched.
    pub fn save(
        &self,
        profile: &UserProfile,
        token: &str,
        remember_days: Option<u32>,
    ) -> Result<Credential> {
        let expires_at = remember_days.map(|days| Utc::now() + Duration::days(i64::from(days)));

        let raw_profile = serde_json::to_string(profile)?;
        if let Err(e) = self.write(&raw_profile, token, expires_at) {
            // A partial write could pair this profile with the previous token.
            warn!(user = %profile.name, error = %e, "Failed to save credential, clearing store");
            self.clear();
            return Err(e);
        }

        debug!(user = %profile.name, remembered = expires_at.is_some(), "Saved credential");
        Ok(Credential {
            profile: profile.clone(),
            token: token.to_string(),
            expires_at,
        })
    }

    fn write(&self, raw_profile: &str, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<()> {
        self.storage.set(USER_KEY, raw_profile)?;
        self.storage.set(TOKEN_KEY, token)?;
        match expires_at {
            Some(at) => self.storage.set(EXPIRY_KEY, &at.to_rfc3339()),
            None => self.storage.remove(EXPIRY_KEY),
        }
    }

    /// Load the stored credential.
    ///
    /// `None` unless both profile and token are present and the profile
    /// parses. Never fails.
    pub fn load(&self) -> Option<Credential> {
        let raw_profile = self.storage.get(USER_KEY)?;
        let token = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())?;

        let profile = match serde_json::from_str::<UserProfile>(&raw_profile) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Stored user profile is corrupt, treating as signed out");
                return None;
            }
        };

        Some(Credential {
            profile,
            token,
            expires_at: self.expires_at(),
        })
    }

    /// Bearer token, if one is stored (with or without a profile).
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Recorded expiry. Unparseable values read as absent.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.storage.get(EXPIRY_KEY)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .ok()
    }

    /// Remove every credential key. Best effort: storage failures are logged.
    pub fn clear(&self) {
        for key in [USER_KEY, TOKEN_KEY, EXPIRY_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove credential key");
            }
        }
        debug!("Cleared credential store");
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.load().is_some()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryStorage;
    use crate::error::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Memory storage whose `set` fails on the given call (1-based).
    struct FailingSet {
        inner: MemoryStorage,
        calls: AtomicUsize,
        fail_on: usize,
    }

    impl KeyValueStorage for FailingSet {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
                return Err(ClientError::storage("disk full"));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    fn store() -> (Arc<MemoryStorage>, CredentialStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = CredentialStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_, store) = store();
        let profile = UserProfile::new("A").with_role("user");
        store.save(&profile, "t1", None).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.profile, profile);
        assert_eq!(loaded.token, "t1");
        assert_eq!(loaded.expires_at, None);
    }

    #[test]
    fn remember_days_records_expiry() {
        let (_, store) = store();
        let saved = store.save(&UserProfile::new("A"), "t1", Some(30)).unwrap();
        let expires_at = store.load().unwrap().expires_at.unwrap();

        let days = (expires_at - Utc::now()).num_hours() as f64 / 24.0;
        assert!((29.9..=30.0).contains(&days), "expiry {days} days out");
        // rfc3339 keeps sub-second precision
        assert_eq!(saved.expires_at.map(|at| at.timestamp()), Some(expires_at.timestamp()));
    }

    #[test]
    fn resave_without_remember_drops_expiry() {
        let (_, store) = store();
        store.save(&UserProfile::new("A"), "t1", Some(30)).unwrap();
        store.save(&UserProfile::new("A"), "t2", None).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "t2");
        assert_eq!(loaded.expires_at, None);
    }

    #[test]
    fn profile_without_token_is_signed_out() {
        let (storage, store) = store();
        storage.set(USER_KEY, r#"{"name":"A"}"#).unwrap();
        assert!(store.load().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn token_without_profile_is_signed_out() {
        let (storage, store) = store();
        storage.set(TOKEN_KEY, "t1").unwrap();
        assert!(store.load().is_none());
        assert!(!store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("t1"));
    }

    #[test]
    fn corrupt_profile_reads_as_absent() {
        let (storage, store) = store();
        storage.set(USER_KEY, "{broken").unwrap();
        storage.set(TOKEN_KEY, "t1").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_removes_everything() {
        let (storage, store) = store();
        store.save(&UserProfile::new("A"), "t1", Some(1)).unwrap();
        store.clear();
        assert!(store.load().is_none());
        assert_eq!(storage.get(EXPIRY_KEY), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn failed_save_does_not_mix_identities() {
        let store = CredentialStore::new(Arc::new(FailingSet {
            inner: MemoryStorage::new(),
            calls: AtomicUsize::new(0),
            // A's save makes three calls; B's token write is the fifth.
            fail_on: 5,
        }));
        store.save(&UserProfile::new("A"), "tA", Some(30)).unwrap();

        let err = store.save(&UserProfile::new("B"), "tB", None).unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
        assert!(store.load().is_none());
        assert_eq!(store.token(), None);
        assert_eq!(store.expires_at(), None);
    }
}
