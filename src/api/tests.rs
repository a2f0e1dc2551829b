use super::test_helpers::{create_test_app, get, post_form, read_text, seeded_store, send};
use crate::registry::{ModuleRecord, ModuleStore};
use axum::http::{header, StatusCode};

#[tokio::test]
async fn test_root_redirects_to_listing() {
    let app = create_test_app(seeded_store());

    let response = send(&app, get("/", false)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/modules");
}

#[tokio::test]
async fn test_listing_for_viewer_has_no_controls() {
    let app = create_test_app(seeded_store());

    let response = send(&app, get("/modules", false)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = read_text(response).await;
    assert_eq!(html.matches("data-module-card").count(), 2);
    assert!(html.contains("https://example.com/anon.git"));
    assert!(!html.contains("data-install-module"));
    assert!(!html.contains("data-uninstall"));
}

#[tokio::test]
async fn test_listing_for_admin_guards_used_modules() {
    let app = create_test_app(seeded_store());

    let html = read_text(send(&app, get("/modules", true)).await).await;

    assert!(html.contains("data-install-module"));
    assert!(html.contains(r#"data-uninstall="anonymizer""#));
    assert!(!html.contains(r#"data-uninstall="segmenter""#));
    assert!(html.contains("ct_rule"));
}

#[tokio::test]
async fn test_install_with_empty_docker_tag() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let response = send(
        &app,
        post_form(
            "/modules",
            "name=foo&url=https%3A%2F%2Fexample.com%2Frepo.git&docker_tag=",
            true,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/modules?installed=foo");

    let foo = store.get("foo").await.unwrap();
    assert_eq!(foo.url, "https://example.com/repo.git");
    assert_eq!(foo.docker_tag, None);
    assert!(foo.installed_at.is_some());

    let html = read_text(send(&app, get("/modules?installed=foo", false)).await).await;
    assert!(html.contains("Module foo installed."));
    assert_eq!(html.matches("data-module-card").count(), 3);
}

#[tokio::test]
async fn test_install_requires_admin() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let response = send(
        &app,
        post_form("/modules", "name=foo&url=https%3A%2F%2Fexample.com%2Frepo.git", false),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    assert!(store.get("foo").await.is_none());
}

#[tokio::test]
async fn test_install_rejects_bad_input() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let bad_name = send(
        &app,
        post_form("/modules", "name=foo%20bar&url=https%3A%2F%2Fexample.com%2Fr.git", true),
    )
    .await;
    assert_eq!(bad_name.status(), StatusCode::BAD_REQUEST);

    let bad_scheme = send(
        &app,
        post_form("/modules", "name=foo&url=http%3A%2F%2Fexample.com%2Fr.git", true),
    )
    .await;
    assert_eq!(bad_scheme.status(), StatusCode::BAD_REQUEST);

    let duplicate = send(
        &app,
        post_form(
            "/modules",
            "name=anonymizer&url=https%3A%2F%2Fexample.com%2Fr.git",
            true,
        ),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    assert_eq!(store.modules().await.len(), 2);
}

#[tokio::test]
async fn test_uninstall_posts_remove_module() {
    let store = seeded_store();
    store
        .install("bar", ModuleRecord::new("https://example.com/bar.git", None))
        .await
        .unwrap();
    let app = create_test_app(store.clone());

    let response = send(&app, post_form("/modules/delete/bar", "", true)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/modules?removed=bar");
    assert!(store.get("bar").await.is_none());
}

#[tokio::test]
async fn test_uninstall_of_used_module_conflicts() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let response = send(&app, post_form("/modules/delete/segmenter", "", true)).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(store.get("segmenter").await.is_some());
}

#[tokio::test]
async fn test_uninstall_unknown_module_is_not_found() {
    let app = create_test_app(seeded_store());

    let response = send(&app, post_form("/modules/delete/ghost", "", true)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uninstall_requires_admin() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let response = send(&app, post_form("/modules/delete/anonymizer", "", false)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(store.get("anonymizer").await.is_some());
}

#[tokio::test]
async fn test_edit_updates_module() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let form = send(&app, get("/modules/edit/anonymizer", true)).await;
    assert_eq!(form.status(), StatusCode::OK);
    assert!(read_text(form).await.contains(r#"value="anon:1.0""#));

    let response = send(
        &app,
        post_form(
            "/modules/edit/anonymizer",
            "url=https%3A%2F%2Fexample.com%2Fanon2.git&docker_tag=anon%3A2.0&settings=%7B%22level%22%3A3%7D",
            true,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let module = store.get("anonymizer").await.unwrap();
    assert_eq!(module.url, "https://example.com/anon2.git");
    assert_eq!(module.docker_tag.as_deref(), Some("anon:2.0"));
    assert_eq!(module.settings["level"], 3);
}

#[tokio::test]
async fn test_edit_with_invalid_settings_reshows_form() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let response = send(
        &app,
        post_form(
            "/modules/edit/anonymizer",
            "url=https%3A%2F%2Fexample.com%2Fanon2.git&docker_tag=&settings=%5B1%2C2%5D",
            true,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = read_text(response).await;
    assert!(html.contains("settings must be a JSON object"));
    assert!(html.contains("https://example.com/anon2.git"));
    assert!(html.contains(r#"rows="12">[1,2]</textarea>"#));
    assert_eq!(
        store.get("anonymizer").await.unwrap().url,
        "https://example.com/anon.git"
    );
}

#[tokio::test]
async fn test_edit_rejection_keeps_submitted_settings_text() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    // Malformed JSON comes back exactly as typed.
    let malformed = send(
        &app,
        post_form(
            "/modules/edit/anonymizer",
            "url=https%3A%2F%2Fexample.com%2Fanon.git&docker_tag=anon%3A1.0&settings=%7B%22level%22%3A+3",
            true,
        ),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    let html = read_text(malformed).await;
    assert!(html.contains(r#"rows="12">{&quot;level&quot;: 3</textarea>"#));

    // A bad URL must not discard valid settings typed alongside it.
    let bad_url = send(
        &app,
        post_form(
            "/modules/edit/anonymizer",
            "url=http%3A%2F%2Fexample.com%2Fanon.git&docker_tag=anon%3A3.0&settings=%7B%22level%22%3A3%7D",
            true,
        ),
    )
    .await;
    assert_eq!(bad_url.status(), StatusCode::BAD_REQUEST);
    let html = read_text(bad_url).await;
    assert!(html.contains(r#"rows="12">{&quot;level&quot;:3}</textarea>"#));
    assert!(html.contains(r#"value="http://example.com/anon.git""#));
    assert!(html.contains(r#"value="anon:3.0""#));

    assert!(store.get("anonymizer").await.unwrap().settings.is_empty());
}

#[tokio::test]
async fn test_listing_links_viewers_to_login() {
    let app = create_test_app(seeded_store());

    let viewer = read_text(send(&app, get("/modules", false)).await).await;
    assert!(viewer.contains(r#"href="/login""#));

    let admin = read_text(send(&app, get("/modules", true)).await).await;
    assert!(!admin.contains(r#"href="/login""#));
}

#[tokio::test]
async fn test_edit_unknown_module_is_not_found() {
    let app = create_test_app(seeded_store());

    let response = send(&app, get("/modules/edit/ghost", true)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_challenges_then_redirects() {
    let app = create_test_app(seeded_store());

    let anonymous = send(&app, get("/login", false)).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        anonymous.headers()[header::WWW_AUTHENTICATE],
        "Basic realm=\"modules\""
    );

    let admin = send(&app, get("/login", true)).await;
    assert_eq!(admin.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_health_reports_module_count() {
    let app = create_test_app(seeded_store());

    let response = send(&app, get("/health", false)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&read_text(response).await).unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok", "modules": 2}));
}
