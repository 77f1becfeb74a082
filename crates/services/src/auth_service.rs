use std::sync::Arc;

use tracing::warn;

use api::remote::AuthGateway;
use api::session::SessionStore;
use curso_core::model::{Session, UserProfile};

/// Resolves the signed-in viewer and handles sign-out.
///
/// Everything here is non-fatal: a failed identity lookup reads as an
/// anonymous viewer, and sign-out clears the local session even when the
/// server-side invalidation fails.
#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthGateway>,
    session: Arc<dyn SessionStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthGateway>, session: Arc<dyn SessionStore>) -> Self {
        Self { auth, session }
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.load()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.token().is_some()
    }

    /// The current viewer's profile, or `None` for an anonymous viewer.
    ///
    /// Prefers the profile cached alongside the token; falls back to
    /// `/auth/me` when a token exists without one, caching the result.
    /// A rejected or failed lookup reads as anonymous.
    pub async fn current_user(&self) -> Option<UserProfile> {
        let session = self.session.load()?;
        if let Some(user) = session.user() {
            return Some(user.clone());
        }

        match self.auth.current_user().await {
            Ok(profile) => {
                let updated = session.with_user(profile.clone());
                if let Err(err) = self.session.save(&updated) {
                    warn!(error = %err, "failed to cache user profile");
                }
                Some(profile)
            }
            Err(err) => {
                warn!(error = %err, "identity lookup failed; treating viewer as anonymous");
                None
            }
        }
    }

    /// Sign the viewer out.
    ///
    /// The server-side invalidation is best-effort; the local session is
    /// cleared regardless.
    pub async fn logout(&self) {
        if self.session.token().is_some() {
            if let Err(err) = self.auth.logout().await {
                warn!(error = %err, "server logout failed; clearing local session anyway");
            }
        }
        self.session.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use api::remote::InMemoryCourseApi;
    use api::session::MemorySessionStore;
    use curso_core::model::UserRole;

    fn profile() -> UserProfile {
        UserProfile::new("ana@example.com", "Ana", UserRole::Student)
    }

    #[tokio::test]
    async fn anonymous_viewer_has_no_user() {
        let backend = Arc::new(InMemoryCourseApi::new());
        let service = AuthService::new(backend, Arc::new(MemorySessionStore::new()));

        assert!(!service.is_authenticated());
        assert!(service.current_user().await.is_none());
    }

    #[tokio::test]
    async fn cached_profile_skips_the_lookup() {
        let backend = Arc::new(InMemoryCourseApi::new());
        let store = Arc::new(MemorySessionStore::with_session(
            Session::new("tok-1", Some(profile())).unwrap(),
        ));
        let service = AuthService::new(backend, store);

        let user = service.current_user().await.unwrap();
        assert_eq!(user.name, "Ana");
    }

    #[tokio::test]
    async fn lookup_fallback_caches_the_profile() {
        let backend = Arc::new(InMemoryCourseApi::new());
        backend.set_user(profile());
        let store = Arc::new(MemorySessionStore::with_session(
            Session::new("tok-1", None).unwrap(),
        ));
        let service = AuthService::new(backend, Arc::clone(&store) as Arc<dyn SessionStore>);

        let user = service.current_user().await.unwrap();
        assert_eq!(user.email, "ana@example.com");
        // Profile is now cached in the session store.
        assert_eq!(store.load().unwrap().user(), Some(&profile()));
    }

    #[tokio::test]
    async fn rejected_lookup_reads_as_anonymous_but_keeps_token() {
        let backend = Arc::new(InMemoryCourseApi::new());
        // No user configured: current_user returns 401.
        let store = Arc::new(MemorySessionStore::with_session(
            Session::new("tok-1", None).unwrap(),
        ));
        let service = AuthService::new(backend, Arc::clone(&store) as Arc<dyn SessionStore>);

        assert!(service.current_user().await.is_none());
        assert_eq!(store.token().as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_server_fails() {
        let backend = Arc::new(InMemoryCourseApi::new());
        backend.fail_mutations(true);
        let store = Arc::new(MemorySessionStore::with_session(
            Session::new("tok-1", Some(profile())).unwrap(),
        ));
        let service = AuthService::new(backend, Arc::clone(&store) as Arc<dyn SessionStore>);

        service.logout().await;
        assert!(store.load().is_none());
        assert!(!service.is_authenticated());
    }
}
