use askama::Template;
use std::collections::BTreeMap;
use url::Url;

use crate::registry::ModuleRecord;

/// One module card on the listing page.
pub struct ModuleCard {
    pub name: String,
    pub url: String,
    pub docker_tag: String,
    pub installed_at: String,
    pub edit_path: String,
    pub used_by: String,
    pub in_use: bool,
}

#[derive(Template)]
#[template(path = "modules.html")]
pub struct ModulesPage {
    pub cards: Vec<ModuleCard>,
    pub is_admin: bool,
    pub message: String,
}

#[derive(Template)]
#[template(path = "module_edit.html")]
pub struct ModuleEditPage {
    pub name: String,
    pub url: String,
    pub docker_tag: String,
    pub settings: String,
    pub action_path: String,
    pub error: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub reason: String,
    pub detail: String,
}

/// Builds `/<prefix>/<name>` with `name` percent-encoded as a single path segment.
pub fn module_path(prefix: &str, name: &str) -> String {
    let mut url = match Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(_) => return format!("/{}/{}", prefix, name),
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear();
        for part in prefix.split('/').filter(|p| !p.is_empty()) {
            segments.push(part);
        }
        segments.push(name);
    }
    url.path().to_string()
}

pub fn build_cards(
    modules: &BTreeMap<String, ModuleRecord>,
    used_modules: &BTreeMap<String, String>,
) -> Vec<ModuleCard> {
    modules
        .iter()
        .map(|(name, module)| {
            let used_by = used_modules.get(name).cloned();
            ModuleCard {
                name: name.clone(),
                url: module.url.clone(),
                docker_tag: module.docker_tag_or_empty().to_string(),
                installed_at: module
                    .installed_at
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_default(),
                edit_path: module_path("modules/edit", name),
                in_use: used_by.is_some(),
                used_by: used_by.unwrap_or_default(),
            }
        })
        .collect()
}

/// Renders the module listing: one card per module, admin controls only when `is_admin`.
pub fn render_modules_page(
    modules: &BTreeMap<String, ModuleRecord>,
    is_admin: bool,
    used_modules: &BTreeMap<String, String>,
) -> Result<String, askama::Error> {
    render_modules_page_with_message(modules, is_admin, used_modules, "")
}

pub fn render_modules_page_with_message(
    modules: &BTreeMap<String, ModuleRecord>,
    is_admin: bool,
    used_modules: &BTreeMap<String, String>,
    message: &str,
) -> Result<String, askama::Error> {
    ModulesPage {
        cards: build_cards(modules, used_modules),
        is_admin,
        message: message.to_string(),
    }
    .render()
}

pub fn render_module_edit_page(
    name: &str,
    module: &ModuleRecord,
    error: &str,
) -> Result<String, askama::Error> {
    let settings = if module.settings.is_empty() {
        String::new()
    } else {
        serde_json::to_string_pretty(&module.settings).unwrap_or_default()
    };

    render_module_edit_form(name, &module.url, module.docker_tag_or_empty(), &settings, error)
}

/// Renders the edit form from raw field text, e.g. a submission that failed validation.
pub fn render_module_edit_form(
    name: &str,
    url: &str,
    docker_tag: &str,
    settings: &str,
    error: &str,
) -> Result<String, askama::Error> {
    ModuleEditPage {
        name: name.to_string(),
        url: url.to_string(),
        docker_tag: docker_tag.to_string(),
        settings: settings.to_string(),
        action_path: module_path("modules/edit", name),
        error: error.to_string(),
    }
    .render()
}

pub fn render_error_page(status: u16, reason: &str, detail: &str) -> Result<String, askama::Error> {
    ErrorPage {
        status,
        reason: reason.to_string(),
        detail: detail.to_string(),
    }
    .render()
}
