use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::convert::Infallible;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::state::AppState;
use super::types::ApiError;
use crate::config::AuthSettings;

/// Whether the caller presented valid administrator credentials.
///
/// Read-only pages use this to decide which controls to show; it never rejects.
#[derive(Debug, Clone, Copy)]
pub struct AdminFlag(pub bool);

/// Rejects the request with a Basic challenge unless the caller is an administrator.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

#[async_trait]
impl FromRequestParts<AppState> for AdminFlag {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(AdminFlag(is_admin(&parts.headers, &state.auth)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if is_admin(&parts.headers, &state.auth) {
            Ok(RequireAdmin)
        } else {
            warn!("Rejected {} {}: not an administrator", parts.method, parts.uri);
            Err(ApiError::Unauthorized)
        }
    }
}

/// Decodes `Authorization: Basic <base64(user:password)>`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Compares both fields in constant time so a mismatch position is not observable.
fn credentials_match(user: &str, password: &str, auth: &AuthSettings) -> bool {
    let user_ok = user.as_bytes().ct_eq(auth.admin_user.as_bytes());
    let password_ok = password.as_bytes().ct_eq(auth.admin_password.as_bytes());
    (user_ok & password_ok).into()
}

pub fn is_admin(headers: &HeaderMap, auth: &AuthSettings) -> bool {
    // Without a configured password nobody can administer modules.
    if auth.admin_password.is_empty() {
        return false;
    }
    match basic_credentials(headers) {
        Some((user, password)) => {
            let ok = credentials_match(&user, &password, auth);
            if !ok {
                debug!("Invalid administrator credentials for user '{}'", user);
            }
            ok
        }
        None => false,
    }
}
