use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::chapter_list::ChapterList;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{format_duration, map_chapter_rows};

#[component]
pub fn ChapterView(slug: String) -> Element {
    let ctx = use_context::<AppContext>();
    let chapter_service = ctx.chapter_service();

    let service_for_resource = chapter_service.clone();
    let resource = use_resource(move || {
        let service = service_for_resource.clone();
        async move {
            service
                .list_chapters()
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let state = view_state_from_resource(&resource);

    let content = match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { "Cargando..." }
        },
        ViewState::Error(err) => rsx! {
            p { "{err.message()}" }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| {
                    let mut resource = resource;
                    resource.restart();
                },
                "Reintentar"
            }
        },
        ViewState::Ready(chapters) => {
            let current = chapters.iter().find(|c| c.slug() == slug).cloned();
            match current {
                None => rsx! {
                    p { class: "chapter-page__missing", "Capítulo no encontrado." }
                    aside { class: "chapter-page__sidebar",
                        h3 { "Capítulos" }
                        ChapterList { rows: map_chapter_rows(&chapters), current: None }
                    }
                },
                Some(chapter) => rsx! {
                    article { class: "chapter-page__body",
                        h2 { "{chapter.title()}" }
                        if chapter.duration_secs() > 0 {
                            p { class: "chapter-page__duration",
                                "Duración: {format_duration(chapter.duration_secs())}"
                            }
                        }
                        if !chapter.description().is_empty() {
                            p { class: "chapter-page__description", "{chapter.description()}" }
                        }
                        if let Some(video) = chapter.video_url() {
                            iframe {
                                class: "chapter-page__video",
                                src: "{video}",
                                allowfullscreen: true,
                            }
                        }
                    }
                    aside { class: "chapter-page__sidebar",
                        h3 { "Capítulos" }
                        ChapterList {
                            rows: map_chapter_rows(&chapters),
                            current: Some(chapter.id()),
                        }
                    }
                },
            }
        }
    };

    rsx! {
        div { class: "page chapter-page", {content} }
    }
}
