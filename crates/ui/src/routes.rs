use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator};

use crate::context::AppContext;
use crate::views::{ChapterView, HomeView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/capitulos/:slug", ChapterView)] Chapter { slug: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
pub(crate) fn Navbar() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth_service();
    let chapters = ctx.chapter_service();
    let navigator = use_navigator();

    let auth_for_user = auth.clone();
    let user_resource = use_resource(move || {
        let auth = auth_for_user.clone();
        async move { auth.current_user().await }
    });

    let chapters_for_link = chapters.clone();
    let first_slug_resource = use_resource(move || {
        let chapters = chapters_for_link.clone();
        async move {
            // Best-effort: without a chapter list the link falls back home.
            chapters
                .list_chapters()
                .await
                .ok()
                .and_then(|list| list.first().map(|c| c.slug().to_owned()))
        }
    });

    let auth_for_logout = auth.clone();
    let on_logout = use_callback(move |()| {
        let auth = auth_for_logout.clone();
        let mut user_resource = user_resource;
        let navigator = navigator;
        spawn(async move {
            auth.logout().await;
            user_resource.restart();
            navigator.push(Route::Home {});
        });
    });

    let chapters_href = first_slug_resource
        .value()
        .read()
        .as_ref()
        .and_then(Clone::clone)
        .map_or_else(|| "/".to_owned(), |slug| format!("/capitulos/{slug}"));

    let user_state = user_resource.value().read().clone();

    rsx! {
        header { class: "navbar",
            a { class: "navbar__brand", href: "/", "Blender: de cero a render" }
            nav { class: "navbar__links",
                a { href: "/", "Inicio" }
                a { href: "{chapters_href}", "Capítulos" }
                match user_state {
                    // Still resolving auth: keep the corner stable, no flicker.
                    None => rsx! {
                        div { class: "navbar__auth navbar__auth--loading" }
                    },
                    Some(Some(user)) => rsx! {
                        div { class: "navbar__auth",
                            span { class: "navbar__badge",
                                {user.initial().map_or_else(String::new, String::from)}
                            }
                            span { class: "navbar__name", "{user.name}" }
                            button {
                                class: "navbar__logout",
                                r#type: "button",
                                onclick: move |_| on_logout.call(()),
                                "Cerrar sesión"
                            }
                        }
                    },
                    Some(None) => rsx! {
                        a { class: "navbar__login", href: "/auth/login", "Iniciar sesión" }
                    },
                }
            }
        }
    }
}
