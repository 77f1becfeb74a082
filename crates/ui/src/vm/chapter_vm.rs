use curso_core::model::{Chapter, ChapterId};

/// UI-ready representation of one chapter row in the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterRowVm {
    pub id: ChapterId,
    pub title: String,
    pub href: String,
}

impl ChapterRowVm {
    #[must_use]
    pub fn new(id: ChapterId, title: String, slug: &str) -> Self {
        let href = format!("/capitulos/{slug}");
        Self { id, title, href }
    }
}

/// Convert domain chapters into list-friendly view models.
#[must_use]
pub fn map_chapter_rows(chapters: &[Chapter]) -> Vec<ChapterRowVm> {
    chapters
        .iter()
        .map(|chapter| {
            ChapterRowVm::new(chapter.id(), chapter.title().to_owned(), chapter.slug())
        })
        .collect()
}
