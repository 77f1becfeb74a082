use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use api::remote::{CourseApi, InMemoryCourseApi};
use api::session::{MemorySessionStore, SessionStore};
use services::{AppServices, AuthService, ChapterService, ProgressService};

use crate::context::{UiApp, build_app_context};
use crate::routes::Navbar;
use crate::views::{ChapterView, HomeView};

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn chapter_service(&self) -> Arc<ChapterService> {
        self.services.chapter_service()
    }

    fn progress_service(&self) -> Arc<ProgressService> {
        self.services.progress_service()
    }

    fn auth_service(&self) -> Arc<AuthService> {
        self.services.auth_service()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Chapter(String),
    Navbar,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Chapter(slug) => rsx! { ChapterView { slug } },
        ViewKind::Navbar => rsx! { Navbar {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: Arc<InMemoryCourseApi>,
    pub session: Arc<MemorySessionStore>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and drive until background resources have had a chance to
    /// resolve (list fetch, then the progress fetch it unlocks).
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_session(view, Arc::new(MemorySessionStore::new()))
}

pub fn setup_view_harness_with_session(
    view: ViewKind,
    session: Arc<MemorySessionStore>,
) -> ViewHarness {
    let backend = Arc::new(InMemoryCourseApi::new());
    let course_api = CourseApi::backed_by(Arc::clone(&backend));
    let services = AppServices::new(
        &course_api,
        Arc::clone(&session) as Arc<dyn SessionStore>,
    );

    let app = Arc::new(TestApp { services });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        backend,
        session,
    }
}
