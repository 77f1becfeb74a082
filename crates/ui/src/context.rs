use std::sync::Arc;

use services::{AuthService, ChapterService, ProgressService};

pub trait UiApp: Send + Sync {
    fn chapter_service(&self) -> Arc<ChapterService>;
    fn progress_service(&self) -> Arc<ProgressService>;
    fn auth_service(&self) -> Arc<AuthService>;
}

#[derive(Clone)]
pub struct AppContext {
    chapters: Arc<ChapterService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            chapters: app.chapter_service(),
            progress: app.progress_service(),
            auth: app.auth_service(),
        }
    }

    #[must_use]
    pub fn chapter_service(&self) -> Arc<ChapterService> {
        Arc::clone(&self.chapters)
    }

    #[must_use]
    pub fn progress_service(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth_service(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
