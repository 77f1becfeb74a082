use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session token cannot be empty")]
    EmptyToken,
}

//
// ─── ROLE ──────────────────────────────────────────────────────────────────────
//

/// Viewer role as reported by the auth service.
///
/// Unknown role strings are preserved verbatim rather than rejected; the
/// client performs no local authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Student,
    Admin,
    Other(String),
}

impl From<String> for UserRole {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "student" => Self::Student,
            "admin" => Self::Admin,
            _ => Self::Other(raw),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Student => "student".to_owned(),
            UserRole::Admin => "admin".to_owned(),
            UserRole::Other(raw) => raw,
        }
    }
}

//
// ─── PROFILE ───────────────────────────────────────────────────────────────────
//

/// Cached profile of the signed-in viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl UserProfile {
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role,
        }
    }

    /// Uppercased first character of the display name, for the avatar badge.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Bearer token plus cached profile identifying the current viewer.
///
/// Absence of a `Session` means an anonymous viewer. The token is opaque;
/// it is issued elsewhere and only stored and attached here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: Option<UserProfile>,
}

impl Session {
    /// Creates a session from an issued token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyToken` if the token is empty or
    /// whitespace-only.
    pub fn new(token: impl Into<String>, user: Option<UserProfile>) -> Result<Self, SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self { token, user })
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Same session with the cached profile replaced.
    #[must_use]
    pub fn with_user(self, user: UserProfile) -> Self {
        Self {
            token: self.token,
            user: Some(user),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_rejects_empty_token() {
        let err = Session::new("   ", None).unwrap_err();
        assert_eq!(err, SessionError::EmptyToken);
    }

    #[test]
    fn session_with_user_caches_profile() {
        let session = Session::new("tok-1", None).unwrap();
        assert!(session.user().is_none());

        let profile = UserProfile::new("ana@example.com", "Ana", UserRole::Student);
        let session = session.with_user(profile.clone());
        assert_eq!(session.user(), Some(&profile));
        assert_eq!(session.token(), "tok-1");
    }

    #[test]
    fn role_round_trips_unknown_strings() {
        let role = UserRole::from("editor".to_owned());
        assert_eq!(role, UserRole::Other("editor".to_owned()));
        assert_eq!(String::from(role), "editor");
    }

    #[test]
    fn profile_initial_is_uppercased() {
        let profile = UserProfile::new("ana@example.com", "ana", UserRole::Student);
        assert_eq!(profile.initial(), Some('A'));

        let nameless = UserProfile::new("x@example.com", "  ", UserRole::Student);
        assert_eq!(nameless.initial(), None);
    }
}
