use thiserror::Error;
use url::Url;

use crate::model::ids::ChapterId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter id is missing")]
    MissingId,

    #[error("chapter title is missing")]
    MissingTitle,

    #[error("chapter slug is missing")]
    MissingSlug,

    #[error("chapter title cannot be empty")]
    EmptyTitle,

    #[error("chapter slug cannot be empty")]
    EmptySlug,

    #[error("chapter slug contains characters unsafe for URLs")]
    InvalidSlug,
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// A unit of course content with a stable id, URL slug, title, and ordering.
///
/// Chapters are owned by the remote course service; the client holds a
/// read-only copy for the current render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: ChapterId,
    slug: String,
    title: String,
    order: u32,
    description: String,
    video_url: Option<Url>,
    duration_secs: u32,
}

impl Chapter {
    /// Creates a new Chapter.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::EmptyTitle` if the title is empty or
    /// whitespace-only, `ChapterError::EmptySlug` for an empty slug, and
    /// `ChapterError::InvalidSlug` when the slug contains characters that
    /// are not safe in a URL path segment.
    pub fn new(
        id: ChapterId,
        slug: impl Into<String>,
        title: impl Into<String>,
        order: u32,
        description: impl Into<String>,
        video_url: Option<Url>,
        duration_secs: u32,
    ) -> Result<Self, ChapterError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ChapterError::EmptyTitle);
        }

        let slug = slug.into();
        if slug.is_empty() {
            return Err(ChapterError::EmptySlug);
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ChapterError::InvalidSlug);
        }

        let description = description.into().trim().to_owned();

        Ok(Self {
            id,
            slug,
            title: title.trim().to_owned(),
            order,
            description,
            video_url,
            duration_secs,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> ChapterId {
        self.id
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn video_url(&self) -> Option<&Url> {
        self.video_url.as_ref()
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build(slug: &str, title: &str) -> Result<Chapter, ChapterError> {
        Chapter::new(ChapterId::new(1), slug, title, 1, "", None, 0)
    }

    #[test]
    fn chapter_new_rejects_empty_title() {
        let err = build("introduccion", "   ").unwrap_err();
        assert_eq!(err, ChapterError::EmptyTitle);
    }

    #[test]
    fn chapter_new_rejects_empty_slug() {
        let err = build("", "Introducción").unwrap_err();
        assert_eq!(err, ChapterError::EmptySlug);
    }

    #[test]
    fn chapter_new_rejects_unsafe_slug() {
        let err = build("capítulo uno", "Introducción").unwrap_err();
        assert_eq!(err, ChapterError::InvalidSlug);

        let err = build("a/b", "Introducción").unwrap_err();
        assert_eq!(err, ChapterError::InvalidSlug);
    }

    #[test]
    fn chapter_new_happy_path() {
        let url = Url::parse("https://www.youtube.com/embed/iGuEJU1oJTA").unwrap();
        let chapter = Chapter::new(
            ChapterId::new(3),
            "modelado-basico",
            "Modelado básico",
            2,
            "Primitivas, edición, extrusión y modificadores.",
            Some(url.clone()),
            540,
        )
        .unwrap();

        assert_eq!(chapter.id(), ChapterId::new(3));
        assert_eq!(chapter.slug(), "modelado-basico");
        assert_eq!(chapter.title(), "Modelado básico");
        assert_eq!(chapter.order(), 2);
        assert_eq!(chapter.video_url(), Some(&url));
        assert_eq!(chapter.duration_secs(), 540);
    }

    #[test]
    fn chapter_trims_title_and_description() {
        let chapter = Chapter::new(
            ChapterId::new(1),
            "render",
            "  Render y exportación  ",
            5,
            "  Cycles/Eevee.  ",
            None,
            0,
        )
        .unwrap();

        assert_eq!(chapter.title(), "Render y exportación");
        assert_eq!(chapter.description(), "Cycles/Eevee.");
    }
}
