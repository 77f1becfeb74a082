use std::sync::Arc;

use tracing::debug;

use api::remote::ChapterDirectory;
use curso_core::model::{Chapter, ChapterId};

use crate::error::ChapterServiceError;

/// Fetches and validates the course's chapter catalog.
#[derive(Clone)]
pub struct ChapterService {
    chapters: Arc<dyn ChapterDirectory>,
}

impl ChapterService {
    #[must_use]
    pub fn new(chapters: Arc<dyn ChapterDirectory>) -> Self {
        Self { chapters }
    }

    /// List chapters ordered for display.
    ///
    /// Rows missing a required field (id, title, slug) are dropped; the
    /// remaining rows keep service order within equal `order` values
    /// (stable sort), so partial upstream data narrows the list instead
    /// of failing it.
    ///
    /// # Errors
    ///
    /// Returns `ChapterServiceError::Api` if the fetch fails.
    pub async fn list_chapters(&self) -> Result<Vec<Chapter>, ChapterServiceError> {
        let records = self.chapters.list_chapters().await?;
        let mut chapters: Vec<Chapter> = records
            .into_iter()
            .filter_map(|record| match record.into_chapter() {
                Ok(chapter) => Some(chapter),
                Err(err) => {
                    debug!(error = %err, "dropping malformed chapter row");
                    None
                }
            })
            .collect();
        chapters.sort_by_key(Chapter::order);
        Ok(chapters)
    }

    /// Fetch a single chapter by id.
    ///
    /// # Errors
    ///
    /// Returns `ChapterServiceError::Api` if the fetch fails and
    /// `ChapterServiceError::Chapter` if the returned row is malformed.
    pub async fn get_chapter(&self, id: ChapterId) -> Result<Chapter, ChapterServiceError> {
        let record = self.chapters.get_chapter(id).await?;
        Ok(record.into_chapter()?)
    }

    /// Resolve a chapter by its URL slug.
    ///
    /// Returns `Ok(None)` when no chapter carries the slug.
    ///
    /// # Errors
    ///
    /// Returns `ChapterServiceError::Api` if the list fetch fails.
    pub async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Chapter>, ChapterServiceError> {
        let chapters = self.list_chapters().await?;
        Ok(chapters.into_iter().find(|c| c.slug() == slug))
    }
}
