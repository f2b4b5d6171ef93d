//! Session lifecycle
//!
//! At most one session exists at a time, persisted as a snapshot of the
//! authenticated profile under its own substrate key. Absence is the
//! logged-out state; reading the current user while logged out is an
//! `Unauthenticated` failure.
//!
//! The snapshot is a copy: it can go stale relative to the canonical
//! profile in the collection store, exactly like the remote service's
//! session object would.

use tracing::{debug, info};

use crate::auth::CredentialRegistry;
use crate::error::{StoreError, StoreResult};
use crate::models::UserProfile;
use crate::query::Query;
use crate::store::Store;
use crate::substrate::Substrate;

/// Substrate key holding the current session snapshot
const SESSION_KEY: &str = "cargo_session";

/// Tracks the currently authenticated identity
pub struct SessionManager<'a> {
    store: &'a Store,
}

impl<'a> SessionManager<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Profile snapshot of the current session
    pub fn current_user(&self) -> StoreResult<UserProfile> {
        match self.store.substrate().read(SESSION_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Err(StoreError::Unauthenticated),
        }
    }

    /// Validate credentials and establish a session
    ///
    /// Resolves the profile by email through the collection store, then
    /// verifies the secret against the credential registry. Any mismatch
    /// is the same `InvalidCredentials` failure, and a failed login leaves
    /// an existing session untouched.
    pub fn login(&self, email: &str, secret: &str) -> StoreResult<UserProfile> {
        let matches: Vec<UserProfile> = self.store.list(&[Query::equal("email", email)])?;
        let profile = match matches.into_iter().next() {
            Some(profile) => profile,
            None => {
                debug!(email, "login failed: unknown email");
                return Err(StoreError::InvalidCredentials);
            }
        };

        if !CredentialRegistry::new(self.store).verify(email, secret)? {
            debug!(email, "login failed: secret mismatch");
            return Err(StoreError::InvalidCredentials);
        }

        let raw = serde_json::to_string(&profile)?;
        self.store.substrate().write(SESSION_KEY, &raw)?;
        info!(user = profile.id.as_str(), role = %profile.role, "session started");
        Ok(profile)
    }

    /// Clear the session; ending a non-existent session is not an error
    pub fn logout(&self) -> StoreResult<()> {
        self.store.substrate().remove(SESSION_KEY)?;
        debug!("session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::Patch;
    use crate::substrate::MemorySubstrate;

    fn memory_store() -> Store {
        Store::with_substrate(Box::new(MemorySubstrate::new()), Config::default())
    }

    #[test]
    fn test_current_user_without_session_is_unauthenticated() {
        let store = memory_store();
        let sessions = SessionManager::new(&store);

        let err = sessions.current_user().unwrap_err();
        assert!(matches!(err, StoreError::Unauthenticated));
    }

    #[test]
    fn test_login_lifecycle() {
        let store = memory_store();
        let sessions = SessionManager::new(&store);

        let profile = sessions.login("rajesh@cargo.com", "demo123").unwrap();
        assert_eq!(profile.id, "driver_1");

        let current = sessions.current_user().unwrap();
        assert_eq!(current, profile);

        sessions.logout().unwrap();
        assert!(matches!(
            sessions.current_user().unwrap_err(),
            StoreError::Unauthenticated
        ));
    }

    #[test]
    fn test_login_with_wrong_secret_fails() {
        let store = memory_store();
        let sessions = SessionManager::new(&store);

        let err = sessions.login("rajesh@cargo.com", "wrong").unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
    }

    #[test]
    fn test_login_with_unknown_email_fails() {
        let store = memory_store();
        let sessions = SessionManager::new(&store);

        let err = sessions.login("nobody@cargo.com", "demo123").unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
    }

    #[test]
    fn test_failed_login_leaves_prior_session_untouched() {
        let store = memory_store();
        let sessions = SessionManager::new(&store);

        sessions.login("admin@cargo.com", "demo123").unwrap();
        let _ = sessions.login("admin@cargo.com", "wrong").unwrap_err();

        let current = sessions.current_user().unwrap();
        assert_eq!(current.id, "admin_1");
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = memory_store();
        let sessions = SessionManager::new(&store);

        sessions.logout().unwrap();
        sessions.logout().unwrap();
    }

    #[test]
    fn test_session_snapshot_can_go_stale() {
        let store = memory_store();
        let sessions = SessionManager::new(&store);

        sessions.login("rajesh@cargo.com", "demo123").unwrap();
        store
            .update::<UserProfile>("driver_1", &Patch::new().set("isOnline", false))
            .unwrap();

        // The snapshot still reflects login-time state
        let current = sessions.current_user().unwrap();
        assert!(current.is_online);
    }
}
