use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;
use url::Url;

use super::auth::{AdminFlag, RequireAdmin};
use super::state::AppState;
use super::types::{ApiError, EditForm, HealthStatus, InstallForm, ListingQuery};
use crate::frontend::{
    render_module_edit_form, render_module_edit_page, render_modules_page_with_message,
};
use crate::registry::ModuleRecord;

pub async fn list_modules(
    State(state): State<AppState>,
    AdminFlag(is_admin): AdminFlag,
    Query(query): Query<ListingQuery>,
) -> Result<Html<String>, ApiError> {
    let modules = state.store.modules().await;
    let used_modules = state.store.used_modules().await;

    let html =
        render_modules_page_with_message(&modules, is_admin, &used_modules, &query.message())?;
    Ok(Html(html))
}

pub async fn install_module(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<InstallForm>,
) -> Result<Redirect, ApiError> {
    let name = form.name.trim();
    validate_name(name)?;
    let url = validate_url(&form.url)?;

    let mut record = ModuleRecord::new(url, normalize_tag(&form.docker_tag));
    record.installed_at = Some(Utc::now());

    state.store.install(name, record).await?;

    info!("Installed module {}", name);
    metrics::increment_counter!("modules_installed_total");
    Ok(redirect_to_listing("installed", name))
}

pub async fn edit_module_form(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, ApiError> {
    let module = state
        .store
        .get(&name)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("module '{}'", name)))?;

    Ok(Html(render_module_edit_page(&name, &module, "")?))
}

pub async fn edit_module(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Form(form): Form<EditForm>,
) -> Result<axum::response::Response, ApiError> {
    let mut module = state
        .store
        .get(&name)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("module '{}'", name)))?;

    let parsed = validate_url(&form.url).and_then(|url| {
        let settings = parse_settings(&form.settings)?;
        Ok((url, settings))
    });

    let (url, settings) = match parsed {
        Ok(values) => values,
        Err(ApiError::Validation(message)) => {
            // Re-show the form with what was submitted so nothing is lost.
            let html = render_module_edit_form(
                &name,
                &form.url,
                &form.docker_tag,
                &form.settings,
                &message,
            )?;
            return Ok((axum::http::StatusCode::BAD_REQUEST, Html(html)).into_response());
        }
        Err(other) => return Err(other),
    };

    module.url = url;
    module.docker_tag = normalize_tag(&form.docker_tag);
    module.settings = settings;
    state.store.update(&name, module).await?;

    info!("Updated module {}", name);
    metrics::increment_counter!("modules_updated_total");
    Ok(redirect_to_listing("updated", &name).into_response())
}

pub async fn delete_module(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Redirect, ApiError> {
    state.store.remove(&name).await?;

    info!("Removed module {}", name);
    metrics::increment_counter!("modules_removed_total");
    Ok(redirect_to_listing("removed", &name))
}

/// Challenges until the browser sends administrator credentials, then returns to the listing.
pub async fn login(_admin: RequireAdmin) -> Redirect {
    Redirect::to("/modules")
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        modules: state.store.modules().await.len(),
    })
}

fn redirect_to_listing(key: &str, name: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, name)
        .finish();
    Redirect::to(&format!("/modules?{}", query))
}

pub(crate) fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() {
        return Err(ApiError::Validation("module name is required".into()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::Validation(format!(
            "module name '{}' may only contain letters, digits, '_' and '-'",
            name
        )));
    }
    Ok(())
}

pub(crate) fn validate_url(raw: &str) -> Result<String, ApiError> {
    let raw = raw.trim();
    let parsed = Url::parse(raw)
        .map_err(|e| ApiError::Validation(format!("invalid URL '{}': {}", raw, e)))?;
    if parsed.scheme() != "https" {
        return Err(ApiError::Validation(format!(
            "URL '{}' must start with https://",
            raw
        )));
    }
    Ok(raw.to_string())
}

fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

pub(crate) fn parse_settings(raw: &str) -> Result<Map<String, Value>, ApiError> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::Validation(
            "settings must be a JSON object".into(),
        )),
        Err(e) => Err(ApiError::Validation(format!("settings are not valid JSON: {}", e))),
    }
}
