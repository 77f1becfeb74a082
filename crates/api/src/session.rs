//! Session persistence.
//!
//! The desktop analog of the site's browser local storage: the bearer
//! token and cached profile live under the `token` and `user` keys of one
//! small JSON document, cleared on logout.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use curso_core::model::{Session, UserProfile};

/// Errors surfaced when persisting a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Client-local storage for the viewer's session.
///
/// `load` and `token` are lenient: a missing or unreadable store reads as
/// an anonymous viewer, never as a failure.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;

    /// Persist the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the session cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    fn clear(&self);

    /// The bearer token, read once per remote call.
    fn token(&self) -> Option<String> {
        self.load().map(|session| session.token().to_owned())
    }
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Session store for tests and anonymous runs.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

//
// ─── FILE-BACKED ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Session store persisted as a JSON file.
///
/// Corrupt or unreadable contents read as logged-out; startup must not
/// fail because of a bad session file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let stored: StoredSession = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt session file");
                return None;
            }
        };
        match Session::new(stored.token, stored.user) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring invalid stored session");
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let stored = StoredSession {
            token: session.token().to_owned(),
            user: session.user().cloned(),
        };
        let raw = serde_json::to_string_pretty(&stored)
            .map_err(|err| SessionStoreError::Serialization(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "failed to clear session file");
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
