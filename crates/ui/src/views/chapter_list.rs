use dioxus::prelude::*;

use curso_core::model::ChapterId;
use curso_core::progress::CompletionSet;

use crate::context::AppContext;
use crate::vm::ChapterRowVm;

/// Ordered chapter list with per-viewer completion state.
///
/// Progress loads in the background on mount; anonymous viewers skip the
/// fetch entirely and every row renders as not completed. A progress-load
/// failure surfaces an inline notice while the list itself still renders.
/// Mark/unmark is offered on the current chapter only, and the local set
/// changes only after the server acknowledges.
#[component]
pub fn ChapterList(rows: Vec<ChapterRowVm>, current: Option<ChapterId>) -> Element {
    let ctx = use_context::<AppContext>();
    let progress_service = ctx.progress_service();

    let completed = use_signal(CompletionSet::new);
    let progress_error = use_signal(|| false);

    let service_for_load = progress_service.clone();
    let _progress_load = use_resource(move || {
        let service = service_for_load.clone();
        let mut completed = completed;
        let mut progress_error = progress_error;
        async move {
            match service.load_progress().await {
                Ok(set) => {
                    progress_error.set(false);
                    completed.set(set);
                }
                // Already logged by the service; chapters keep rendering.
                Err(_) => progress_error.set(true),
            }
        }
    });

    let service_for_actions = progress_service.clone();
    let on_toggle = use_callback(move |(chapter, currently_completed): (ChapterId, bool)| {
        let service = service_for_actions.clone();
        let mut completed = completed;
        spawn(async move {
            let result = if currently_completed {
                service.unmark_completed(chapter).await
            } else {
                service.mark_completed(chapter).await
            };
            // A failed mutation leaves the set untouched; nothing to roll back.
            if let Ok(set) = result {
                completed.set(set);
            }
        });
    });

    if rows.is_empty() {
        return rsx! {
            nav { class: "chapter-list",
                ol { class: "chapter-list__items",
                    li { class: "chapter-list__empty", "No hay capítulos disponibles" }
                }
            }
        };
    }

    let completed_now = completed.read().clone();

    rsx! {
        nav { class: "chapter-list",
            if progress_error() {
                p { class: "chapter-list__notice", "Error al cargar el progreso" }
            }
            ol { class: "chapter-list__items",
                for row in rows.into_iter() {
                    ChapterRow {
                        key: "{row.id}",
                        is_current: current == Some(row.id),
                        is_completed: completed_now.contains(row.id),
                        on_toggle,
                        row,
                    }
                }
            }
        }
    }
}

#[component]
fn ChapterRow(
    row: ChapterRowVm,
    is_current: bool,
    is_completed: bool,
    on_toggle: EventHandler<(ChapterId, bool)>,
) -> Element {
    let chapter = row.id;
    let link_class = if is_current {
        "chapter-list__link chapter-list__link--current"
    } else {
        "chapter-list__link"
    };

    rsx! {
        li { class: "chapter-list__item", "data-chapter-id": "{row.id}",
            div { class: "chapter-list__row",
                a { class: link_class, href: "{row.href}", "{row.title}" }
                if is_current && !is_completed {
                    button {
                        class: "chapter-list__action",
                        r#type: "button",
                        onclick: move |_| on_toggle.call((chapter, false)),
                        "Completar"
                    }
                }
                if is_current && is_completed {
                    button {
                        class: "chapter-list__action chapter-list__action--undo",
                        r#type: "button",
                        onclick: move |_| on_toggle.call((chapter, true)),
                        "Desmarcar"
                    }
                }
                if !is_current && is_completed {
                    span { class: "chapter-list__check", "✓" }
                }
            }
        }
    }
}
