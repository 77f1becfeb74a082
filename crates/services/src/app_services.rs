use std::sync::Arc;

use api::remote::CourseApi;
use api::session::SessionStore;

use crate::auth_service::AuthService;
use crate::chapter_service::ChapterService;
use crate::progress_service::ProgressService;

/// Assembles the app-facing services over one course API backend.
#[derive(Clone)]
pub struct AppServices {
    chapters: Arc<ChapterService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
}

impl AppServices {
    #[must_use]
    pub fn new(course_api: &CourseApi, session: Arc<dyn SessionStore>) -> Self {
        let chapters = Arc::new(ChapterService::new(Arc::clone(&course_api.chapters)));
        let progress = Arc::new(ProgressService::new(
            Arc::clone(&course_api.progress),
            Arc::clone(&session),
        ));
        let auth = Arc::new(AuthService::new(Arc::clone(&course_api.auth), session));

        Self {
            chapters,
            progress,
            auth,
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
