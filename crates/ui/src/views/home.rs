use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::chapter_list::ChapterList;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::map_chapter_rows;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let chapter_service = ctx.chapter_service();

    let service_for_resource = chapter_service.clone();
    let resource = use_resource(move || {
        let service = service_for_resource.clone();
        async move {
            service
                .list_chapters()
                .await
                .map_err(|_| crate::views::ViewError::Unknown)
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page home-page",
            h2 { "Blender: de cero a render" }
            p { class: "home-page__lead",
                "Un curso en video para aprender Blender desde cero, capítulo a capítulo."
            }
            section { class: "home-page__syllabus",
                h3 { "Temario" }
                match state {
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
                    ViewState::Ready(chapters) => rsx! {
                        ChapterList { rows: map_chapter_rows(&chapters), current: None }
                    },
                }
            }
        }
    }
}
