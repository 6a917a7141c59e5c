//! Shared-secret authentication for admin routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method};

use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the configured admin key in `X-API-Key`.
///
/// Declare it before any body extractor so a bad key is rejected with 401
/// before the body is read:
///
/// ```ignore
/// async fn handler(_admin: AdminKey, State(state): State<AppState>, body: Bytes) { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AdminKey::check(&parts.headers, &parts.method, parts.uri.path(), state)
    }
}

impl AdminKey {
    /// Compare the request's `X-API-Key` against the configured key.
    pub fn check(
        headers: &HeaderMap,
        method: &Method,
        path: &str,
        state: &AppState,
    ) -> Result<Self, ApiError> {
        let supplied = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());

        if is_authorized(supplied, &state.config.admin_api_key) {
            Ok(AdminKey)
        } else {
            tracing::warn!("Rejected admin request to {} {}", method, path);
            Err(ApiError::Unauthorized)
        }
    }
}

/// Whether `path` falls under the admin prefix, matched route or not.
pub fn is_admin_path(path: &str) -> bool {
    path.strip_prefix(routes::ADMIN_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Plain equality against the configured key.
pub fn is_authorized(supplied: Option<&str>, expected: &str) -> bool {
    supplied == Some(expected)
}
