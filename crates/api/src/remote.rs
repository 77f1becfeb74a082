//! Contracts for the remote course service, plus an in-memory double.
//!
//! The durable store for chapters, progress, and identity is the remote
//! REST API; these traits keep services independent of the transport so
//! tests can run against `InMemoryCourseApi`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use curso_core::model::{Chapter, ChapterError, ChapterId, UserProfile};

use crate::error::ApiError;

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Wire shape for one chapter row.
///
/// Every field is optional: upstream data can be partial, and a malformed
/// row must drop out of the list rather than fail the whole response.
/// Strictness lives in [`ChapterRecord::into_chapter`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChapterRecord {
    pub id: Option<u64>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub order: Option<u32>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<u32>,
}

impl ChapterRecord {
    #[must_use]
    pub fn from_chapter(chapter: &Chapter) -> Self {
        Self {
            id: Some(chapter.id().value()),
            slug: Some(chapter.slug().to_owned()),
            title: Some(chapter.title().to_owned()),
            order: Some(chapter.order()),
            description: Some(chapter.description().to_owned()),
            video_url: chapter.video_url().map(Url::to_string),
            duration: Some(chapter.duration_secs()),
        }
    }

    /// Convert the record into a domain `Chapter`.
    ///
    /// An unparseable video URL decodes to no video rather than an error;
    /// the video is decoration, the row is not.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError` when id, title, or slug is missing or fails
    /// validation.
    pub fn into_chapter(self) -> Result<Chapter, ChapterError> {
        let id = self.id.ok_or(ChapterError::MissingId)?;
        let slug = self.slug.ok_or(ChapterError::MissingSlug)?;
        let title = self.title.ok_or(ChapterError::MissingTitle)?;

        let video_url = self
            .video_url
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| Url::parse(raw).ok());

        Chapter::new(
            ChapterId::new(id),
            slug,
            title,
            self.order.unwrap_or(0),
            self.description.unwrap_or_default(),
            video_url,
            self.duration.unwrap_or(0),
        )
    }
}

/// One row of the viewer's progress as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRecord {
    pub chapter_id: ChapterId,
    pub is_completed: bool,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Read access to the course's chapter catalog.
#[async_trait]
pub trait ChapterDirectory: Send + Sync {
    /// Fetch all chapter rows in service order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` on a non-2xx response and
    /// `ApiError::Network` on transport failure.
    async fn list_chapters(&self) -> Result<Vec<ChapterRecord>, ApiError>;

    /// Fetch a single chapter row.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` on a non-2xx response (including 404),
    /// `ApiError::Network` on transport failure, or `ApiError::Shape` when
    /// the body is not a chapter object.
    async fn get_chapter(&self, id: ChapterId) -> Result<ChapterRecord, ApiError>;
}

/// The viewer's completion state on the remote service.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch the viewer's progress rows.
    ///
    /// A malformed body decodes to the empty list; shape problems never
    /// fail this call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` on a non-2xx response and
    /// `ApiError::Network` on transport failure.
    async fn fetch_progress(&self) -> Result<Vec<ProgressRecord>, ApiError>;

    /// Record the chapter as watched.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` on a non-2xx response and
    /// `ApiError::Network` on transport failure.
    async fn mark_watched(&self, id: ChapterId) -> Result<(), ApiError>;

    /// Remove any progress for the chapter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` on a non-2xx response and
    /// `ApiError::Network` on transport failure.
    async fn remove_progress(&self, id: ChapterId) -> Result<(), ApiError>;
}

/// Identity endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Fetch the profile behind the current token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (typically 401) when the token is
    /// missing or rejected, `ApiError::Network` on transport failure, or
    /// `ApiError::Shape` when the body is not a user envelope.
    async fn current_user(&self) -> Result<UserProfile, ApiError>;

    /// Invalidate the current token on the server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` on a non-2xx response and
    /// `ApiError::Network` on transport failure.
    async fn logout(&self) -> Result<(), ApiError>;
}

/// Aggregates the three contracts behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct CourseApi {
    pub chapters: Arc<dyn ChapterDirectory>,
    pub progress: Arc<dyn ProgressStore>,
    pub auth: Arc<dyn AuthGateway>,
}

impl CourseApi {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::backed_by(Arc::new(InMemoryCourseApi::new()))
    }

    /// Build from one backend implementing all three contracts.
    #[must_use]
    pub fn backed_by<B>(backend: Arc<B>) -> Self
    where
        B: ChapterDirectory + ProgressStore + AuthGateway + 'static,
    {
        Self {
            chapters: Arc::clone(&backend) as Arc<dyn ChapterDirectory>,
            progress: Arc::clone(&backend) as Arc<dyn ProgressStore>,
            auth: backend as Arc<dyn AuthGateway>,
        }
    }
}

//
// ─── IN-MEMORY DOUBLE ──────────────────────────────────────────────────────────
//

/// In-memory course service for tests and offline prototyping.
///
/// Failure toggles flip individual operations to a 500 response; call
/// counters let tests assert that a path issued no request at all.
#[derive(Clone, Default)]
pub struct InMemoryCourseApi {
    chapters: Arc<Mutex<Vec<ChapterRecord>>>,
    progress: Arc<Mutex<HashMap<ChapterId, bool>>>,
    user: Arc<Mutex<Option<UserProfile>>>,
    fail_chapters: Arc<AtomicBool>,
    fail_progress_fetch: Arc<AtomicBool>,
    fail_mutations: Arc<AtomicBool>,
    progress_fetches: Arc<AtomicU32>,
}

impl InMemoryCourseApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_chapters(&self, chapters: Vec<ChapterRecord>) {
        *lock(&self.chapters) = chapters;
    }

    pub fn set_completed(&self, ids: impl IntoIterator<Item = ChapterId>) {
        let mut guard = lock(&self.progress);
        for id in ids {
            guard.insert(id, true);
        }
    }

    pub fn set_user(&self, user: UserProfile) {
        *lock(&self.user) = Some(user);
    }

    pub fn fail_chapters(&self, fail: bool) {
        self.fail_chapters.store(fail, Ordering::SeqCst);
    }

    pub fn fail_progress_fetch(&self, fail: bool) {
        self.fail_progress_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Number of `fetch_progress` calls issued against this double.
    #[must_use]
    pub fn progress_fetch_count(&self) -> u32 {
        self.progress_fetches.load(Ordering::SeqCst)
    }

    /// Completion flag currently stored for the chapter.
    #[must_use]
    pub fn stored_completion(&self, id: ChapterId) -> bool {
        lock(&self.progress).get(&id).copied().unwrap_or(false)
    }

    fn server_error() -> ApiError {
        ApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ChapterDirectory for InMemoryCourseApi {
    async fn list_chapters(&self) -> Result<Vec<ChapterRecord>, ApiError> {
        if self.fail_chapters.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        Ok(lock(&self.chapters).clone())
    }

    async fn get_chapter(&self, id: ChapterId) -> Result<ChapterRecord, ApiError> {
        if self.fail_chapters.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        lock(&self.chapters)
            .iter()
            .find(|record| record.id == Some(id.value()))
            .cloned()
            .ok_or(ApiError::Status(reqwest::StatusCode::NOT_FOUND))
    }
}

#[async_trait]
impl ProgressStore for InMemoryCourseApi {
    async fn fetch_progress(&self) -> Result<Vec<ProgressRecord>, ApiError> {
        self.progress_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_progress_fetch.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        Ok(lock(&self.progress)
            .iter()
            .map(|(&chapter_id, &is_completed)| ProgressRecord {
                chapter_id,
                is_completed,
            })
            .collect())
    }

    async fn mark_watched(&self, id: ChapterId) -> Result<(), ApiError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        lock(&self.progress).insert(id, true);
        Ok(())
    }

    async fn remove_progress(&self, id: ChapterId) -> Result<(), ApiError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        // The service reports removed progress as an isCompleted=false row.
        lock(&self.progress).insert(id, false);
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for InMemoryCourseApi {
    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        lock(&self.user)
            .clone()
            .ok_or(ApiError::Status(reqwest::StatusCode::UNAUTHORIZED))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        *lock(&self.user) = None;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
