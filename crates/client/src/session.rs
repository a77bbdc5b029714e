//! Explicit session context: bearer token + user profile.
//!
//! One [`SessionStore`] is created at application startup and handed to the
//! [`crate::ApiClient`] at construction. The session inside it is created at
//! login and destroyed at logout or on the first 401 -- there is no global
//! mutable auth state anywhere else.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::types::UserProfile;

/// An authenticated session: the bearer token and the profile it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Thread-safe holder for the current session, optionally persisted to a
/// JSON file so a restarted client resumes where it left off.
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
    /// When set, the session is mirrored to this file on every change.
    path: Option<PathBuf>,
}

impl SessionStore {
    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            inner: RwLock::new(None),
            path: None,
        }
    }

    /// A store mirrored to `path`. An existing readable session file is
    /// loaded; a corrupt or missing one simply starts logged out.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let initial = std::fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Session>(&bytes).ok());
        Self {
            inner: RwLock::new(initial),
            path: Some(path),
        }
    }

    /// Install a new session (login).
    pub fn set(&self, session: Session) {
        if let Some(path) = &self.path {
            match serde_json::to_vec(&session) {
                Ok(bytes) => {
                    if let Err(e) = std::fs::write(path, bytes) {
                        tracing::warn!(error = %e, "Failed to persist session file");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Failed to serialize session"),
            }
        }
        *self.inner.write().expect("session lock poisoned") = Some(session);
    }

    /// Remove the session (logout or 401).
    ///
    /// Returns `true` only if a session was actually present, so the caller
    /// can react to the *first* invalidation and ignore repeats.
    pub fn clear(&self) -> bool {
        let had_session = self
            .inner
            .write()
            .expect("session lock poisoned")
            .take()
            .is_some();
        if had_session {
            if let Some(path) = &self.path {
                if let Err(e) = std::fs::remove_file(path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(error = %e, "Failed to remove session file");
                    }
                }
            }
        }
        had_session
    }

    /// The current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// The current user profile, if logged in.
    pub fn user(&self) -> Option<UserProfile> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().expect("session lock poisoned").is_some()
    }

    /// Role check used by the admin screens' route guards.
    pub fn is_admin(&self) -> bool {
        self.inner
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .is_some_and(|s| s.user.role == taskpoints_core::roles::ROLE_ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session(role: &str) -> Session {
        Session {
            token: "tok-123".into(),
            user: UserProfile {
                id: 1,
                username: "alice".into(),
                email: "alice@example.com".into(),
                role: role.into(),
                total_points: 0,
            },
        }
    }

    #[test]
    fn test_set_and_role_checks() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());
        assert!(!store.is_admin());

        store.set(test_session("admin"));
        assert!(store.is_authenticated());
        assert!(store.is_admin());
        assert_eq!(store.token().as_deref(), Some("tok-123"));

        store.set(test_session("user"));
        assert!(!store.is_admin());
    }

    #[test]
    fn test_clear_reports_first_invalidation_only() {
        let store = SessionStore::in_memory();
        store.set(test_session("user"));

        assert!(store.clear(), "first clear removes the session");
        assert!(!store.clear(), "second clear is a no-op");
        assert!(store.token().is_none());
    }

    #[test]
    fn test_file_persistence_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let store = SessionStore::with_file(&path);
        assert!(!store.is_authenticated());
        store.set(test_session("admin"));
        assert!(path.exists());

        // A fresh store over the same file resumes the session.
        let resumed = SessionStore::with_file(&path);
        assert!(resumed.is_admin());
        assert_eq!(resumed.token().as_deref(), Some("tok-123"));

        resumed.clear();
        assert!(!path.exists(), "clearing removes the file");
    }

    #[test]
    fn test_corrupt_session_file_starts_logged_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").expect("write");

        let store = SessionStore::with_file(&path);
        assert!(!store.is_authenticated());
    }
}
