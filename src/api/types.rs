use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::frontend::render_error_page;
use crate::registry::StoreError;

pub const ADMIN_REALM: &str = "modules";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Administrator credentials required")]
    Unauthorized,
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => ApiError::NotFound(format!("module '{}'", name)),
            StoreError::AlreadyExists(_) | StoreError::InUse { .. } => {
                ApiError::Conflict(err.to_string())
            }
            other => ApiError::Store(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::Render(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log.
        let detail = if status.is_server_error() {
            error!("Request failed: {}", self);
            "The server could not complete the request.".to_string()
        } else {
            self.to_string()
        };

        let reason = status.canonical_reason().unwrap_or("Error");
        let body = render_error_page(status.as_u16(), reason, &detail)
            .unwrap_or_else(|_| format!("{} {}", status.as_u16(), reason));

        let mut response = (status, Html(body)).into_response();
        if matches!(self, ApiError::Unauthorized) {
            if let Ok(value) = format!("Basic realm=\"{}\"", ADMIN_REALM).parse() {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}

/// Form body of the install dialog.
#[derive(Debug, Deserialize)]
pub struct InstallForm {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub docker_tag: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub url: String,
    #[serde(default)]
    pub docker_tag: String,
    #[serde(default)]
    pub settings: String,
}

/// Query parameters the handlers attach when redirecting back to the listing.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListingQuery {
    pub installed: Option<String>,
    pub updated: Option<String>,
    pub removed: Option<String>,
}

impl ListingQuery {
    pub fn message(&self) -> String {
        if let Some(name) = &self.installed {
            format!("Module {} installed.", name)
        } else if let Some(name) = &self.updated {
            format!("Module {} updated.", name)
        } else if let Some(name) = &self.removed {
            format!("Module {} removed.", name)
        } else {
            String::new()
        }
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub modules: usize,
}
