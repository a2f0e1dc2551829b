use axum::{body::Body, http::Request, response::Response, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use tower::ServiceExt;

use super::{create_router, AppState};
use crate::config::AuthSettings;
use crate::registry::{MemoryStore, ModuleRecord, ModuleStore, RegistryConfig, Rule};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "test-password";

/// Store holding `anonymizer` (unused) and `segmenter` (used by `ct_rule`).
pub fn seeded_store() -> Arc<MemoryStore> {
    let mut config = RegistryConfig::default();
    config.modules.insert(
        "anonymizer".into(),
        ModuleRecord::new("https://example.com/anon.git", Some("anon:1.0".into())),
    );
    config.modules.insert(
        "segmenter".into(),
        ModuleRecord::new("https://example.com/seg.git", None),
    );
    config.rules.insert(
        "ct_rule".into(),
        Rule {
            processing_module: Some("segmenter".into()),
            ..Default::default()
        },
    );
    Arc::new(MemoryStore::new(config))
}

pub fn create_test_app(store: Arc<MemoryStore>) -> Router {
    let store: Arc<dyn ModuleStore> = store;
    create_router(AppState::new(
        store,
        AuthSettings {
            admin_user: ADMIN_USER.into(),
            admin_password: ADMIN_PASSWORD.into(),
        },
    ))
}

pub fn admin_auth() -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", ADMIN_USER, ADMIN_PASSWORD))
    )
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, admin: bool) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if admin {
        builder = builder.header("authorization", admin_auth());
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, admin: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if admin {
        builder = builder.header("authorization", admin_auth());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn read_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
