use std::sync::Arc;

use api::remote::ChapterRecord;
use api::session::MemorySessionStore;
use curso_core::model::{ChapterId, Session, UserProfile, UserRole};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_session};

fn record(id: u64, slug: &str, title: &str, order: u32) -> ChapterRecord {
    ChapterRecord {
        id: Some(id),
        slug: Some(slug.to_owned()),
        title: Some(title.to_owned()),
        order: Some(order),
        ..ChapterRecord::default()
    }
}

fn course_chapters() -> Vec<ChapterRecord> {
    vec![
        record(1, "introduccion", "Introducción y configuración", 1),
        record(2, "modelado-basico", "Modelado básico", 2),
        record(3, "materiales", "Materiales y texturas", 3),
    ]
}

fn signed_in_session() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_session(
        Session::new(
            "tok-1",
            Some(UserProfile::new("ana@example.com", "Ana", UserRole::Student)),
        )
        .unwrap(),
    ))
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_renders_chapter_titles_and_links() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness.backend.set_chapters(course_chapters());

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Temario"), "missing syllabus heading in {html}");
    assert!(
        html.contains("Introducción y configuración"),
        "missing chapter title in {html}"
    );
    assert!(
        html.contains("/capitulos/modelado-basico"),
        "missing chapter link in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_renders_placeholder_without_chapters() {
    let mut harness = setup_view_harness(ViewKind::Home);

    harness.settle().await;
    let html = harness.render();

    assert!(
        html.contains("No hay capítulos disponibles"),
        "missing placeholder in {html}"
    );
    assert!(
        !html.contains("data-chapter-id"),
        "unexpected list items in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_excludes_malformed_rows_in_input_order() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness.backend.set_chapters(vec![
        record(1, "introduccion", "Introducción y configuración", 1),
        ChapterRecord {
            id: Some(2),
            title: Some("Sin slug".into()),
            order: Some(2),
            ..ChapterRecord::default()
        },
        record(3, "materiales", "Materiales y texturas", 3),
    ]);

    harness.settle().await;
    let html = harness.render();

    assert!(!html.contains("Sin slug"), "malformed row rendered in {html}");
    let first = html.find("Introducción y configuración").unwrap();
    let second = html.find("Materiales y texturas").unwrap();
    assert!(first < second, "chapter order not preserved in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_view_offers_completar_on_current_chapter() {
    let mut harness = setup_view_harness_with_session(
        ViewKind::Chapter("introduccion".into()),
        signed_in_session(),
    );
    harness.backend.set_chapters(course_chapters());

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Completar"), "missing mark button in {html}");
    assert!(!html.contains("Desmarcar"), "unexpected unmark button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_view_offers_desmarcar_when_current_is_completed() {
    let mut harness = setup_view_harness_with_session(
        ViewKind::Chapter("introduccion".into()),
        signed_in_session(),
    );
    harness.backend.set_chapters(course_chapters());
    harness.backend.set_completed([ChapterId::new(1)]);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Desmarcar"), "missing unmark button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn completed_noncurrent_chapters_show_checkmark() {
    let mut harness = setup_view_harness_with_session(
        ViewKind::Chapter("introduccion".into()),
        signed_in_session(),
    );
    harness.backend.set_chapters(course_chapters());
    harness.backend.set_completed([ChapterId::new(2)]);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("✓"), "missing checkmark in {html}");
    // The current chapter is not completed, so it still offers marking.
    assert!(html.contains("Completar"), "missing mark button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn progress_failure_still_renders_chapter_list() {
    let mut harness = setup_view_harness_with_session(
        ViewKind::Chapter("introduccion".into()),
        signed_in_session(),
    );
    harness.backend.set_chapters(course_chapters());
    harness.backend.set_completed([ChapterId::new(2)]);
    harness.backend.fail_progress_fetch(true);

    harness.settle().await;
    let html = harness.render();

    assert!(
        html.contains("Error al cargar el progreso"),
        "missing progress notice in {html}"
    );
    assert!(
        html.contains("Modelado básico"),
        "chapter list missing in {html}"
    );
    assert!(
        html.contains("/capitulos/materiales"),
        "chapter links missing in {html}"
    );
    assert!(!html.contains("✓"), "stale completion rendered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn anonymous_viewer_sees_no_progress_and_issues_no_fetch() {
    let mut harness = setup_view_harness(ViewKind::Chapter("introduccion".into()));
    harness.backend.set_chapters(course_chapters());
    harness.backend.set_completed([ChapterId::new(2)]);

    harness.settle().await;
    let html = harness.render();

    assert!(!html.contains("✓"), "completion rendered for anonymous in {html}");
    assert_eq!(
        harness.backend.progress_fetch_count(),
        0,
        "anonymous viewer must not fetch progress"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_view_unknown_slug_shows_missing_notice() {
    let mut harness = setup_view_harness(ViewKind::Chapter("no-existe".into()));
    harness.backend.set_chapters(course_chapters());

    harness.settle().await;
    let html = harness.render();

    assert!(
        html.contains("Capítulo no encontrado."),
        "missing not-found notice in {html}"
    );
    // The syllabus still renders so the viewer can navigate out.
    assert!(html.contains("Introducción y configuración"));
}

#[tokio::test(flavor = "current_thread")]
async fn navbar_shows_user_and_logout_when_signed_in() {
    let mut harness =
        setup_view_harness_with_session(ViewKind::Navbar, signed_in_session());
    harness.backend.set_chapters(course_chapters());

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Ana"), "missing user name in {html}");
    assert!(html.contains("Cerrar sesión"), "missing logout in {html}");
    assert!(
        html.contains("/capitulos/introduccion"),
        "chapters link should target the first chapter in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn navbar_shows_login_when_anonymous() {
    let mut harness = setup_view_harness(ViewKind::Navbar);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Iniciar sesión"), "missing login link in {html}");
    assert!(!html.contains("Cerrar sesión"), "unexpected logout in {html}");
}
