use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use api::remote::ProgressStore;
use api::session::SessionStore;
use curso_core::model::ChapterId;
use curso_core::progress::{CompletionSet, Desired, ProgressState};

use crate::error::ProgressServiceError;

/// Tracks which chapters the current viewer has completed.
///
/// The remote service owns the durable state; this service keeps the
/// per-visit copy and applies mutations only after server acknowledgment,
/// guarded by the action ledger so a stale acknowledgment can never
/// overwrite a newer action on the same chapter.
pub struct ProgressService {
    progress: Arc<dyn ProgressStore>,
    session: Arc<dyn SessionStore>,
    state: Mutex<ProgressState>,
}

impl ProgressService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressStore>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            progress,
            session,
            state: Mutex::new(ProgressState::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the viewer's completion set from the remote service.
    ///
    /// Anonymous viewers (no stored token) get the empty set without any
    /// network call. On success the set is replaced wholesale. On failure
    /// the set is left empty and the error is returned for an inline
    /// notice; progress is best-effort and must never block the chapter
    /// list from rendering.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Api` when the fetch fails.
    pub async fn load_progress(&self) -> Result<CompletionSet, ProgressServiceError> {
        if self.session.token().is_none() {
            let mut state = self.state();
            state.clear();
            return Ok(state.snapshot());
        }

        match self.progress.fetch_progress().await {
            Ok(records) => {
                let completed: CompletionSet = records
                    .into_iter()
                    .filter(|record| record.is_completed)
                    .map(|record| record.chapter_id)
                    .collect();
                let mut state = self.state();
                state.replace(completed);
                Ok(state.snapshot())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch progress");
                self.state().clear();
                Err(err.into())
            }
        }
    }

    /// Mark the chapter as watched.
    ///
    /// The local set changes only after the server acknowledges; on
    /// failure it is left exactly as it was. No retry.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Api` when the mutation fails.
    pub async fn mark_completed(
        &self,
        chapter: ChapterId,
    ) -> Result<CompletionSet, ProgressServiceError> {
        self.mutate(chapter, Desired::Completed).await
    }

    /// Remove the watched mark from the chapter.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Api` when the mutation fails.
    pub async fn unmark_completed(
        &self,
        chapter: ChapterId,
    ) -> Result<CompletionSet, ProgressServiceError> {
        self.mutate(chapter, Desired::NotCompleted).await
    }

    async fn mutate(
        &self,
        chapter: ChapterId,
        desired: Desired,
    ) -> Result<CompletionSet, ProgressServiceError> {
        let ticket = self.state().begin(chapter, desired);

        let result = match desired {
            Desired::Completed => self.progress.mark_watched(chapter).await,
            Desired::NotCompleted => self.progress.remove_progress(chapter).await,
        };

        match result {
            Ok(()) => {
                let mut state = self.state();
                if !state.settle(ticket) {
                    debug!(%chapter, "discarding acknowledgment for superseded action");
                }
                Ok(state.snapshot())
            }
            Err(err) => {
                warn!(error = %err, %chapter, "progress mutation failed; local state unchanged");
                Err(err.into())
            }
        }
    }

    /// Pure membership test against the current completion set.
    #[must_use]
    pub fn is_completed(&self, chapter: ChapterId) -> bool {
        self.state().is_completed(chapter)
    }

    #[must_use]
    pub fn snapshot(&self) -> CompletionSet {
        self.state().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use api::remote::InMemoryCourseApi;
    use api::session::MemorySessionStore;
    use curso_core::model::Session;

    fn signed_in() -> Arc<MemorySessionStore> {
        Arc::new(MemorySessionStore::with_session(
            Session::new("tok-1", None).unwrap(),
        ))
    }

    #[tokio::test]
    async fn anonymous_load_issues_no_network_call() {
        let backend = Arc::new(InMemoryCourseApi::new());
        backend.set_completed([ChapterId::new(1)]);
        let service = ProgressService::new(
            Arc::clone(&backend) as Arc<dyn ProgressStore>,
            Arc::new(MemorySessionStore::new()),
        );

        let set = service.load_progress().await.unwrap();
        assert!(set.is_empty());
        assert_eq!(backend.progress_fetch_count(), 0);
        assert!(!service.is_completed(ChapterId::new(1)));
    }

    #[tokio::test]
    async fn load_replaces_set_wholesale() {
        let backend = Arc::new(InMemoryCourseApi::new());
        backend.set_completed([ChapterId::new(2), ChapterId::new(5)]);
        let service =
            ProgressService::new(Arc::clone(&backend) as Arc<dyn ProgressStore>, signed_in());

        let set = service.load_progress().await.unwrap();
        assert_eq!(set.len(), 2);
        assert!(service.is_completed(ChapterId::new(2)));
        assert!(!service.is_completed(ChapterId::new(1)));
    }

    #[tokio::test]
    async fn load_failure_leaves_set_empty_and_reports() {
        let backend = Arc::new(InMemoryCourseApi::new());
        backend.set_completed([ChapterId::new(2)]);
        backend.fail_progress_fetch(true);
        let service =
            ProgressService::new(Arc::clone(&backend) as Arc<dyn ProgressStore>, signed_in());

        assert!(service.load_progress().await.is_err());
        assert!(service.snapshot().is_empty());
    }

    #[tokio::test]
    async fn mark_applies_only_after_acknowledgment() {
        let backend = Arc::new(InMemoryCourseApi::new());
        let service =
            ProgressService::new(Arc::clone(&backend) as Arc<dyn ProgressStore>, signed_in());

        let set = service.mark_completed(ChapterId::new(3)).await.unwrap();
        assert!(set.contains(ChapterId::new(3)));
        assert!(backend.stored_completion(ChapterId::new(3)));
    }

    #[tokio::test]
    async fn failed_mark_leaves_set_unchanged() {
        let backend = Arc::new(InMemoryCourseApi::new());
        let service =
            ProgressService::new(Arc::clone(&backend) as Arc<dyn ProgressStore>, signed_in());
        let before = service.snapshot();

        backend.fail_mutations(true);
        assert!(service.mark_completed(ChapterId::new(3)).await.is_err());
        assert_eq!(service.snapshot(), before);
    }

    #[tokio::test]
    async fn unmark_removes_membership() {
        let backend = Arc::new(InMemoryCourseApi::new());
        backend.set_completed([ChapterId::new(2)]);
        let service =
            ProgressService::new(Arc::clone(&backend) as Arc<dyn ProgressStore>, signed_in());
        service.load_progress().await.unwrap();

        let set = service.unmark_completed(ChapterId::new(2)).await.unwrap();
        assert!(!set.contains(ChapterId::new(2)));
        assert!(!backend.stored_completion(ChapterId::new(2)));
    }

    #[tokio::test]
    async fn repeated_marks_end_with_single_membership() {
        let backend = Arc::new(InMemoryCourseApi::new());
        let service =
            ProgressService::new(Arc::clone(&backend) as Arc<dyn ProgressStore>, signed_in());

        service.mark_completed(ChapterId::new(3)).await.unwrap();
        let set = service.mark_completed(ChapterId::new(3)).await.unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(ChapterId::new(3)));
    }
}
